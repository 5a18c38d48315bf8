//! Message types for the Groq chat-completion API.
//!
//! Requests follow the OpenAI chat format. Responses are parsed leniently:
//! `choices` is optional so a JSON body without it (typically an error
//! envelope) can be told apart from a body that is not JSON at all.

use serde::{Deserialize, Serialize};

// =============================================================================
// Request
// =============================================================================

/// Role of a chat message author.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

/// A single chat message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }
}

/// Body of `POST /chat/completions`.
#[derive(Debug, Clone, Serialize)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
}

impl ChatCompletionRequest {
    /// Build the two-message request used for every caller turn.
    pub fn for_turn(model: &str, system_prompt: &str, prompt: &str) -> Self {
        Self {
            model: model.to_string(),
            messages: vec![ChatMessage::system(system_prompt), ChatMessage::user(prompt)],
        }
    }
}

// =============================================================================
// Response
// =============================================================================

/// Chat completion response.
///
/// Fields other than `choices` are ignored, whatever their shape.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatCompletionResponse {
    /// Completion candidates. `None` when the vendor returned some other JSON shape.
    #[serde(default)]
    pub choices: Option<Vec<Choice>>,
}

/// Body of a failed request.
#[derive(Debug, Clone, Deserialize)]
pub struct GroqErrorResponse {
    pub error: GroqApiError,
}

/// A completion candidate.
#[derive(Debug, Clone, Deserialize)]
pub struct Choice {
    #[serde(default)]
    pub index: u32,
    pub message: AssistantMessage,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

/// Assistant message inside a choice.
#[derive(Debug, Clone, Deserialize)]
pub struct AssistantMessage {
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
}

/// Error details returned by Groq.
#[derive(Debug, Clone, Deserialize)]
pub struct GroqApiError {
    pub message: String,
    #[serde(rename = "type", default)]
    pub error_type: Option<String>,
    /// A string such as `"invalid_api_key"`, sometimes a number.
    #[serde(default)]
    pub code: Option<serde_json::Value>,
}

impl ChatCompletionResponse {
    /// Content of the first choice, if any.
    pub fn first_content(&self) -> Option<&str> {
        self.choices
            .as_ref()?
            .first()?
            .message
            .content
            .as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_serialization() {
        let request = ChatCompletionRequest::for_turn("llama3-8b-8192", "persona", "hi");
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value,
            json!({
                "model": "llama3-8b-8192",
                "messages": [
                    {"role": "system", "content": "persona"},
                    {"role": "user", "content": "hi"}
                ]
            })
        );
    }

    #[test]
    fn test_response_parsing() {
        let body = r#"{
            "id": "chatcmpl-1",
            "object": "chat.completion",
            "choices": [
                {"index": 0, "message": {"role": "assistant", "content": "  Hello there. "}, "finish_reason": "stop"}
            ],
            "usage": {"total_tokens": 12}
        }"#;
        let response: ChatCompletionResponse = serde_json::from_str(body).unwrap();
        assert_eq!(response.first_content(), Some("  Hello there. "));
    }

    #[test]
    fn test_error_envelope_has_no_choices() {
        let body = r#"{"error": {"message": "Invalid API Key", "type": "invalid_request_error", "code": "invalid_api_key"}}"#;
        let response: ChatCompletionResponse = serde_json::from_str(body).unwrap();
        assert!(response.choices.is_none());

        let envelope: GroqErrorResponse = serde_json::from_str(body).unwrap();
        assert_eq!(envelope.error.message, "Invalid API Key");
        assert_eq!(envelope.error.code, Some(json!("invalid_api_key")));
    }

    #[test]
    fn test_error_envelope_numeric_code() {
        let body = r#"{"error": {"message": "Rate limit reached", "code": 429}}"#;
        let envelope: GroqErrorResponse = serde_json::from_str(body).unwrap();
        assert_eq!(envelope.error.code, Some(json!(429)));
    }

    #[test]
    fn test_non_object_error_is_ignored() {
        let response: ChatCompletionResponse =
            serde_json::from_str(r#"{"error": "rate limited"}"#).unwrap();
        assert!(response.choices.is_none());
    }

    #[test]
    fn test_empty_choices() {
        let response: ChatCompletionResponse =
            serde_json::from_str(r#"{"choices": []}"#).unwrap();
        assert!(response.choices.is_some());
        assert_eq!(response.first_content(), None);
    }
}
