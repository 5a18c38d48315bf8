//! Twilio Programmable Voice integration.
//!
//! - [`TwilioClient`]: originates outbound calls through the REST Calls API
//! - [`twiml`]: renders call-control markup for webhook responses
//! - [`signature`]: validates `X-Twilio-Signature` on incoming webhooks
//! - [`messages`]: REST responses and webhook form payloads
//!
//! # Configuration
//!
//! ```bash
//! export TWILIO_ACCOUNT_SID="AC..."
//! export TWILIO_AUTH_TOKEN="..."
//! export TWILIO_PHONE_NUMBER="+15017122661"
//! export TO_PHONE_NUMBER="+15558675310"
//! export PUBLIC_BASE_URL="https://agent.example.com"
//! ```

mod base;
mod client;
pub mod config;
pub mod messages;
pub mod signature;
pub mod twiml;

pub use base::{CallOriginator, OutboundCall, TelephonyError};
pub use client::TwilioClient;
pub use config::{TWILIO_API_BASE_URL, TWILIO_API_VERSION, TwilioConfig};
pub use messages::{CallResource, TwilioErrorResponse, VoiceWebhook};
pub use signature::{SIGNATURE_HEADER, SignatureError, compute_signature, verify_signature};
pub use twiml::{Gather, Speech, SpeechTimeout, TwimlBuilder, TwimlResponse, VoiceStyle};
