//! HTTP request handlers
//!
//! - `api` - Liveness endpoint
//! - `calls` - Outbound call initiation
//! - `voice` - Twilio voice webhooks (greeting and gather turns)

pub mod api;
pub mod calls;
pub mod voice;
