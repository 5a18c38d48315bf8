//! Twilio wire types: REST responses and webhook form payloads.

use serde::{Deserialize, Serialize};

// =============================================================================
// Calls API
// =============================================================================

/// Call resource returned by `POST /Accounts/{sid}/Calls.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallResource {
    pub sid: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub to: Option<String>,
    #[serde(default)]
    pub from: Option<String>,
}

/// Error body returned by the Twilio REST API.
#[derive(Debug, Clone, Deserialize)]
pub struct TwilioErrorResponse {
    #[serde(default)]
    pub code: Option<i64>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub more_info: Option<String>,
    #[serde(default)]
    pub status: Option<u16>,
}

// =============================================================================
// Voice Webhooks
// =============================================================================

/// Form fields Twilio posts to voice webhooks.
///
/// Only the fields the agent reads are modelled; Twilio sends many more and
/// they are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VoiceWebhook {
    #[serde(rename = "CallSid", default)]
    pub call_sid: Option<String>,
    #[serde(rename = "From", default)]
    pub from: Option<String>,
    #[serde(rename = "To", default)]
    pub to: Option<String>,
    #[serde(rename = "CallStatus", default)]
    pub call_status: Option<String>,
    /// Transcribed caller speech (gather action only).
    #[serde(rename = "SpeechResult", default)]
    pub speech_result: Option<String>,
    /// Raw transcription confidence (gather action only); read it through
    /// [`VoiceWebhook::confidence`].
    #[serde(rename = "Confidence", default)]
    pub confidence: Option<String>,
}

impl VoiceWebhook {
    /// Call SID for log fields.
    pub fn call_sid_or_unknown(&self) -> &str {
        self.call_sid.as_deref().unwrap_or("unknown")
    }

    /// Transcribed speech, or an empty string when absent.
    pub fn speech(&self) -> &str {
        self.speech_result.as_deref().unwrap_or("")
    }

    /// Parsed transcription confidence; `None` when absent, blank or not a number.
    pub fn confidence(&self) -> Option<f32> {
        self.confidence.as_deref()?.trim().parse().ok()
    }
}
