//! Configuration types for the Groq chat-completion API.
//!
//! Groq exposes an OpenAI-compatible REST surface. The agent only needs the
//! `/chat/completions` endpoint with a single system persona and a single
//! user turn, so the configuration is small:
//!
//! - API key (bearer token)
//! - Base URL (overridable for tests and proxies)
//! - Model name
//! - Request timeout
//! - System persona

use std::time::Duration;

use zeroize::Zeroizing;

// =============================================================================
// Constants
// =============================================================================

/// Groq OpenAI-compatible API base URL.
pub const GROQ_API_BASE_URL: &str = "https://api.groq.com/openai/v1";

/// Path of the chat completions endpoint, relative to the base URL.
pub const CHAT_COMPLETIONS_PATH: &str = "/chat/completions";

/// Default chat model.
pub const DEFAULT_MODEL: &str = "llama3-8b-8192";

/// Default request timeout in seconds.
///
/// Twilio abandons a webhook after 15 seconds, so the LLM round trip has to
/// finish well inside that window for the fallback sentence to still be spoken.
pub const DEFAULT_TIMEOUT_SECS: u64 = 8;

/// Upper bound for the configurable timeout (Twilio webhook deadline minus margin).
pub const MAX_TIMEOUT_SECS: u64 = 14;

/// Connect timeout in seconds.
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 3;

/// System instruction sent with every completion request.
pub const SALES_PERSONA_PROMPT: &str = "You are John, a warm, persuasive insurance sales assistant. \
Your tone is helpful, professional, and human. \
Explain benefits clearly and briefly—life, health, and vehicle insurance. \
End with a friendly sales hook. Keep it under 50 words.";

// =============================================================================
// Groq Chat Configuration
// =============================================================================

/// Configuration for [`GroqChat`](super::GroqChat).
#[derive(Clone)]
pub struct GroqChatConfig {
    /// Groq API key sent as `Authorization: Bearer <key>`. Wiped on drop.
    pub api_key: Zeroizing<String>,
    /// API base URL without a trailing slash.
    pub base_url: String,
    /// Chat model identifier.
    pub model: String,
    /// Total request timeout.
    pub timeout: Duration,
    /// System instruction (persona) for every request.
    pub system_prompt: String,
}

impl std::fmt::Debug for GroqChatConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GroqChatConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl Default for GroqChatConfig {
    fn default() -> Self {
        Self {
            api_key: Zeroizing::new(String::new()),
            base_url: GROQ_API_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            system_prompt: SALES_PERSONA_PROMPT.to_string(),
        }
    }
}

impl GroqChatConfig {
    /// Create a configuration with the given API key and defaults elsewhere.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Zeroizing::new(api_key.into()),
            ..Default::default()
        }
    }

    /// Full URL of the chat completions endpoint.
    pub fn completions_url(&self) -> String {
        format!(
            "{}{}",
            self.base_url.trim_end_matches('/'),
            CHAT_COMPLETIONS_PATH
        )
    }

    /// Validate the configuration.
    ///
    /// An empty API key is allowed here: requests will be rejected by the
    /// vendor and the caller still hears a fallback sentence.
    pub fn validate(&self) -> Result<(), String> {
        if self.model.trim().is_empty() {
            return Err("LLM model must not be empty".to_string());
        }
        if self.base_url.trim().is_empty() {
            return Err("LLM base URL must not be empty".to_string());
        }
        if self.timeout.is_zero() {
            return Err("LLM timeout must be greater than zero".to_string());
        }
        Ok(())
    }
}
