use async_trait::async_trait;
use thiserror::Error;

/// Spoken when the vendor answered but not with a usable completion
/// (non-2xx status, or JSON without `choices`).
pub const FALLBACK_REPLY_UNEXPECTED_RESPONSE: &str = "We offer plans to protect your life, health, or car. They’re affordable and hassle-free. Want to hear more?";

/// Spoken when the request itself failed or the body could not be read.
pub const FALLBACK_REPLY_REQUEST_FAILED: &str =
    "Our insurance plans are designed to give peace of mind. Let me know what you’re looking for.";

/// Errors raised while requesting a completion.
///
/// None of these reach the caller on the phone: [`ReplyComposer`]
/// implementations map every variant to a fixed fallback sentence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LLMError {
    /// Connection failure, timeout, or unreadable body.
    #[error("LLM transport error: {0}")]
    Transport(String),

    /// The vendor answered with a non-success status.
    #[error("LLM returned status {status}: {message}")]
    Status { status: u16, message: String },

    /// The body was JSON but carried no `choices` field.
    #[error("LLM response has no choices: {0}")]
    MissingChoices(String),

    /// The body was not JSON, or `choices` held no usable content.
    #[error("Malformed LLM response: {0}")]
    MalformedResponse(String),

    /// The client could not be built.
    #[error("LLM configuration error: {0}")]
    Configuration(String),
}

impl LLMError {
    /// Whether this is a response-format failure rather than a transport one.
    pub fn is_format_error(&self) -> bool {
        matches!(self, Self::MissingChoices(_) | Self::MalformedResponse(_))
    }

    /// Fallback sentence for this failure.
    pub fn fallback_reply(&self) -> &'static str {
        match self {
            Self::Status { .. } | Self::MissingChoices(_) => FALLBACK_REPLY_UNEXPECTED_RESPONSE,
            Self::Transport(_) | Self::MalformedResponse(_) | Self::Configuration(_) => {
                FALLBACK_REPLY_REQUEST_FAILED
            }
        }
    }
}

/// Turns a caller utterance into a spoken reply.
///
/// Implementations must always return text; failures are recovered locally.
#[async_trait]
pub trait ReplyComposer: Send + Sync {
    async fn compose_reply(&self, prompt: &str) -> String;
}
