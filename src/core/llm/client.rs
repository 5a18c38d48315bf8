//! Groq chat-completion client.
//!
//! One request per caller turn: the fixed persona as the system message and
//! the caller's utterance as the only user message. The client never retries;
//! a failed turn is answered with a fallback sentence instead, because Twilio
//! is waiting on the webhook response while we talk to the vendor.

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, info, warn};

use super::base::{LLMError, ReplyComposer};
use super::config::{DEFAULT_CONNECT_TIMEOUT_SECS, GroqChatConfig};
use super::messages::{ChatCompletionRequest, ChatCompletionResponse, GroqErrorResponse};

/// User-Agent header value for API requests.
const USER_AGENT: &str = concat!("voice-sales-agent/", env!("CARGO_PKG_VERSION"));

/// Longest slice of a vendor body copied into error messages and logs.
const MAX_LOGGED_BODY_CHARS: usize = 512;

/// Groq chat-completion client implementing [`ReplyComposer`].
#[derive(Debug, Clone)]
pub struct GroqChat {
    config: GroqChatConfig,
    http_client: Client,
}

impl GroqChat {
    /// Create a new client. The HTTP client is built once and reused, so
    /// connections to Groq are pooled across webhooks.
    pub fn new(config: GroqChatConfig) -> Result<Self, LLMError> {
        config.validate().map_err(LLMError::Configuration)?;

        let connect_timeout = Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS).min(config.timeout);
        let http_client = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(connect_timeout)
            .user_agent(USER_AGENT)
            .pool_idle_timeout(Duration::from_secs(90))
            .build()
            .map_err(|e| LLMError::Configuration(format!("Failed to build HTTP client: {e}")))?;

        if config.api_key.is_empty() {
            warn!("Groq API key is not configured; caller turns will be answered with fallback replies");
        }

        Ok(Self {
            config,
            http_client,
        })
    }

    /// Get the configuration.
    pub fn config(&self) -> &GroqChatConfig {
        &self.config
    }

    /// Request a completion for `prompt` and return the trimmed reply.
    pub async fn complete(&self, prompt: &str) -> Result<String, LLMError> {
        let request =
            ChatCompletionRequest::for_turn(&self.config.model, &self.config.system_prompt, prompt);

        debug!(model = %self.config.model, "Sending chat completion request to Groq");

        let response = self
            .http_client
            .post(self.config.completions_url())
            .header("Authorization", format!("Bearer {}", self.config.api_key.as_str()))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| LLMError::Transport(format!("Request failed: {e}")))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| LLMError::Transport(format!("Failed to read response: {e}")))?;

        if !status.is_success() {
            let message = serde_json::from_str::<GroqErrorResponse>(&body)
                .map(|parsed| parsed.error.message)
                .ok()
                .unwrap_or_else(|| truncate_for_log(&body));
            return Err(LLMError::Status {
                status: status.as_u16(),
                message,
            });
        }

        parse_completion(&body)
    }
}

/// Extract the reply from a successful response body.
pub(crate) fn parse_completion(body: &str) -> Result<String, LLMError> {
    let value: serde_json::Value = serde_json::from_str(body)
        .map_err(|e| LLMError::MalformedResponse(format!("Invalid JSON: {e}")))?;

    if value.get("choices").is_none_or(serde_json::Value::is_null) {
        return Err(LLMError::MissingChoices(truncate_for_log(body)));
    }

    let parsed: ChatCompletionResponse = serde_json::from_value(value)
        .map_err(|e| LLMError::MalformedResponse(format!("Unexpected choices shape: {e}")))?;

    let reply = parsed
        .first_content()
        .map(str::trim)
        .ok_or_else(|| {
            LLMError::MalformedResponse("First choice carries no message content".to_string())
        })?;

    if reply.is_empty() {
        return Err(LLMError::MalformedResponse(
            "First choice has empty content".to_string(),
        ));
    }

    Ok(reply.to_string())
}

fn truncate_for_log(body: &str) -> String {
    if body.chars().count() <= MAX_LOGGED_BODY_CHARS {
        body.to_string()
    } else {
        let head: String = body.chars().take(MAX_LOGGED_BODY_CHARS).collect();
        format!("{head}...")
    }
}

#[async_trait]
impl ReplyComposer for GroqChat {
    async fn compose_reply(&self, prompt: &str) -> String {
        match self.complete(prompt).await {
            Ok(reply) => {
                info!("AI Assistant: {}", reply);
                reply
            }
            Err(e) => {
                warn!(
                    error = %e,
                    format_error = e.is_format_error(),
                    "Groq completion failed, answering with fallback reply"
                );
                e.fallback_reply().to_string()
            }
        }
    }
}
