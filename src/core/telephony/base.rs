use async_trait::async_trait;
use thiserror::Error;

/// Parameters for an outbound call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundCall {
    /// Number to dial (E.164).
    pub to: String,
    /// Caller ID, a number owned by the account (E.164).
    pub from: String,
    /// Public URL Twilio fetches call-control instructions from once answered.
    pub callback_url: String,
}

/// Errors raised by the telephony provider.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TelephonyError {
    /// Credentials or numbers are missing from the server configuration.
    #[error("Telephony provider is not configured: {0}")]
    NotConfigured(String),

    /// The request never produced an HTTP response.
    #[error("Telephony network error: {0}")]
    Network(String),

    /// The provider rejected the request.
    #[error("Telephony provider returned status {status} (code {code:?}): {message}")]
    Api {
        status: u16,
        code: Option<i64>,
        message: String,
    },

    /// The provider answered 2xx with a body we could not use.
    #[error("Invalid telephony provider response: {0}")]
    InvalidResponse(String),

    /// The client could not be built.
    #[error("Telephony configuration error: {0}")]
    Configuration(String),
}

/// Places outbound calls.
#[async_trait]
pub trait CallOriginator: Send + Sync {
    /// Originate `call` and return the provider's call identifier (SID).
    async fn originate_call(&self, call: &OutboundCall) -> Result<String, TelephonyError>;
}
