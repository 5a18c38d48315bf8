//! Twilio Calls API client.

use async_trait::async_trait;
use reqwest::Client;
use tracing::{error, info};

use super::base::{CallOriginator, OutboundCall, TelephonyError};
use super::config::TwilioConfig;
use super::messages::{CallResource, TwilioErrorResponse};

/// User-Agent header value for API requests.
const USER_AGENT: &str = concat!("voice-sales-agent/", env!("CARGO_PKG_VERSION"));

/// Twilio REST client implementing [`CallOriginator`].
#[derive(Debug, Clone)]
pub struct TwilioClient {
    config: TwilioConfig,
    http_client: Client,
}

impl TwilioClient {
    pub fn new(config: TwilioConfig) -> Result<Self, TelephonyError> {
        config.validate().map_err(TelephonyError::Configuration)?;

        let http_client = Client::builder()
            .timeout(config.timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| {
                TelephonyError::Configuration(format!("Failed to build HTTP client: {e}"))
            })?;

        Ok(Self {
            config,
            http_client,
        })
    }

    pub fn config(&self) -> &TwilioConfig {
        &self.config
    }
}

#[async_trait]
impl CallOriginator for TwilioClient {
    async fn originate_call(&self, call: &OutboundCall) -> Result<String, TelephonyError> {
        info!(to = %call.to, from = %call.from, url = %call.callback_url, "Creating outbound call");

        let response = self
            .http_client
            .post(self.config.calls_url())
            .basic_auth(&self.config.account_sid, Some(self.config.auth_token.as_str()))
            .form(&[
                ("To", call.to.as_str()),
                ("From", call.from.as_str()),
                ("Url", call.callback_url.as_str()),
                ("Method", "POST"),
            ])
            .send()
            .await
            .map_err(|e| TelephonyError::Network(format!("Request failed: {e}")))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| TelephonyError::Network(format!("Failed to read response: {e}")))?;

        if !status.is_success() {
            let parsed = serde_json::from_str::<TwilioErrorResponse>(&body).ok();
            let code = parsed.as_ref().and_then(|e| e.code);
            let message = parsed
                .and_then(|e| e.message)
                .unwrap_or_else(|| status.canonical_reason().unwrap_or("unknown error").to_string());
            error!(status = status.as_u16(), ?code, %message, "Twilio rejected call creation");
            return Err(TelephonyError::Api {
                status: status.as_u16(),
                code,
                message,
            });
        }

        let resource: CallResource = serde_json::from_str(&body)
            .map_err(|e| TelephonyError::InvalidResponse(format!("Invalid call resource: {e}")))?;

        if resource.sid.is_empty() {
            return Err(TelephonyError::InvalidResponse(
                "Call resource has an empty sid".to_string(),
            ));
        }

        info!(call_sid = %resource.sid, status = ?resource.status, "Outbound call created");
        Ok(resource.sid)
    }
}
