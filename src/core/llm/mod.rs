//! Groq chat-completion provider used to compose the agent's spoken replies.
//!
//! # Request
//!
//! ```json
//! POST https://api.groq.com/openai/v1/chat/completions
//! Authorization: Bearer gsk_...
//!
//! {
//!   "model": "llama3-8b-8192",
//!   "messages": [
//!     {"role": "system", "content": "You are John, ..."},
//!     {"role": "user", "content": "Tell me about health insurance"}
//!   ]
//! }
//! ```
//!
//! The reply is `choices[0].message.content`, trimmed.
//!
//! # Failure policy
//!
//! [`ReplyComposer::compose_reply`] never fails. Transport errors and
//! unparseable bodies map to [`FALLBACK_REPLY_REQUEST_FAILED`]; error
//! statuses and bodies without `choices` map to
//! [`FALLBACK_REPLY_UNEXPECTED_RESPONSE`].
//!
//! # Configuration
//!
//! ```bash
//! export GROQ_API_KEY="gsk_..."
//! export GROQ_MODEL="llama3-8b-8192"
//! export LLM_TIMEOUT_SECONDS=8
//! ```

mod base;
mod client;
pub mod config;
pub mod messages;


pub use base::{
    FALLBACK_REPLY_REQUEST_FAILED, FALLBACK_REPLY_UNEXPECTED_RESPONSE, LLMError, ReplyComposer,
};
pub use client::GroqChat;
pub use config::{
    CHAT_COMPLETIONS_PATH, DEFAULT_MODEL, DEFAULT_TIMEOUT_SECS, GROQ_API_BASE_URL,
    GroqChatConfig, MAX_TIMEOUT_SECS, SALES_PERSONA_PROMPT,
};
pub use messages::{
    ChatCompletionRequest, ChatCompletionResponse, ChatMessage, ChatRole, GroqErrorResponse,
};
