use std::sync::Arc;

use tracing::{info, warn};

use crate::config::ServerConfig;
use crate::core::agent::{CallAgent, INCOMING_CALL_PATH};
use crate::core::llm::GroqChat;
use crate::core::telephony::{CallOriginator, TelephonyError, TwilioClient};
use crate::errors::{AppError, AppResult};
use crate::utils::validate_phone_number;

/// Application state shared by all handlers
///
/// Built once at startup from [`ServerConfig`]; read-only afterwards.
#[derive(Debug)]
pub struct AppState {
    pub config: ServerConfig,
    pub agent: CallAgent,
}

impl AppState {
    /// Build the Groq and Twilio clients and the call agent from `config`.
    ///
    /// Missing Twilio credentials are not an error: webhooks still work and
    /// `/call` answers 503.
    pub fn new(config: ServerConfig) -> AppResult<Arc<Self>> {
        let composer = GroqChat::new(config.groq_config())
            .map_err(|e| AppError::Configuration(e.to_string()))?;

        let originator: Option<Arc<dyn CallOriginator>> = match config.twilio_config() {
            Some(twilio_config) => {
                Some(Arc::new(TwilioClient::new(twilio_config)?) as Arc<dyn CallOriginator>)
            }
            None => {
                warn!("Twilio credentials not configured, outbound calls are disabled");
                None
            }
        };

        let agent = CallAgent::new(config.agent_settings(), Arc::new(composer), originator);
        info!(
            model = %config.groq_model,
            can_originate = agent.can_originate(),
            validate_signatures = config.twilio_validate_signatures,
            "Call agent ready"
        );

        Ok(Self::with_agent(config, agent))
    }

    /// Assemble state around an existing agent.
    pub fn with_agent(config: ServerConfig, agent: CallAgent) -> Arc<Self> {
        Arc::new(Self { config, agent })
    }

    /// Place an outbound call to `to_override` or the configured number.
    ///
    /// Returns the call SID.
    pub async fn place_outbound_call(&self, to_override: Option<&str>) -> AppResult<String> {
        let to = match to_override {
            Some(number) => validate_phone_number(number)
                .map_err(|e| AppError::BadRequest(e.to_string()))?
                .to_string(),
            None => self
                .config
                .to_phone_number
                .clone()
                .ok_or_else(|| not_configured("TO_PHONE_NUMBER is not set"))?,
        };
        let from = self
            .config
            .twilio_phone_number
            .clone()
            .ok_or_else(|| not_configured("TWILIO_PHONE_NUMBER is not set"))?;
        let callback_url = self
            .config
            .public_url(INCOMING_CALL_PATH)
            .ok_or_else(|| not_configured("PUBLIC_BASE_URL is not set"))?;

        Ok(self.agent.initiate_call(&to, &from, &callback_url).await?)
    }
}

fn not_configured(message: &str) -> AppError {
    AppError::Telephony(TelephonyError::NotConfigured(message.to_string()))
}
