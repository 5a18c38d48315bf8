//! Configuration module for the voice sales agent
//!
//! This module handles server configuration from various sources: .env files, YAML files,
//! and environment variables. Priority: YAML > ENV vars > .env values > defaults.
//!
//! # Modules
//! - `yaml`: YAML configuration file loading
//! - `env`: Environment variable loading
//! - `merge`: Merging YAML and environment configurations
//! - `validation`: Configuration validation logic
//!
//! # Example
//! ```rust,no_run
//! use voice_sales_agent::config::ServerConfig;
//! use std::path::PathBuf;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! // Load from environment variables only
//! let config = ServerConfig::from_env()?;
//!
//! // Load from YAML file with environment variable overrides
//! let config_path = PathBuf::from("config.yaml");
//! let config = ServerConfig::from_file(&config_path)?;
//!
//! println!("Server listening on {}", config.address());
//! # Ok(())
//! # }
//! ```

use std::path::PathBuf;
use std::time::Duration;

mod env;
mod merge;
mod validation;
mod yaml;

use crate::core::agent::{AgentSettings, DEFAULT_GATHER_TIMEOUT_SECS, DEFAULT_MAX_SILENT_REPROMPTS};
use crate::core::llm::{DEFAULT_MODEL, DEFAULT_TIMEOUT_SECS, GROQ_API_BASE_URL, GroqChatConfig};
use crate::core::telephony::{TWILIO_API_BASE_URL, TwilioConfig, VoiceStyle};
use crate::utils::join_public_url;

/// TLS configuration for HTTPS
#[derive(Debug, Clone)]
pub struct TlsConfig {
    /// Path to the TLS certificate file (PEM format)
    pub cert_path: PathBuf,
    /// Path to the TLS private key file (PEM format)
    pub key_path: PathBuf,
}

/// Server configuration
///
/// Loaded once at startup and shared read-only through `AppState`.
#[derive(Clone)]
pub struct ServerConfig {
    // Server settings
    pub host: String,
    pub port: u16,
    pub tls: Option<TlsConfig>,
    /// Public https origin Twilio reaches this server on, without a
    /// trailing slash. Outbound call callbacks and signature checks are
    /// built from it.
    pub public_base_url: Option<String>,
    /// Directory served under `/static`
    pub static_dir: PathBuf,

    // Twilio
    pub twilio_account_sid: Option<String>,
    pub twilio_auth_token: Option<String>,
    /// Caller ID for outbound calls (E.164)
    pub twilio_phone_number: Option<String>,
    /// Default number dialled by `/call` (E.164)
    pub to_phone_number: Option<String>,
    pub twilio_api_base_url: String,
    /// Reject webhooks whose `X-Twilio-Signature` does not verify
    pub twilio_validate_signatures: bool,

    // Groq
    pub groq_api_key: Option<String>,
    pub groq_base_url: String,
    pub groq_model: String,
    pub llm_timeout: Duration,

    // Agent
    pub voice_name: String,
    pub voice_language: String,
    pub gather_timeout_seconds: u32,
    pub max_silent_reprompts: u32,

    // Security configuration
    /// CORS allowed origins (comma-separated list or "*" for all)
    /// Default: None (CORS disabled, same-origin only)
    pub cors_allowed_origins: Option<String>,
    /// Maximum requests per second per IP address
    /// Default: 60
    pub rate_limit_requests_per_second: u32,
    /// Maximum burst size for rate limiting
    /// Default: 10
    pub rate_limit_burst_size: u32,
}

impl std::fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let redact = |secret: &Option<String>| secret.as_ref().map(|_| "<redacted>");
        f.debug_struct("ServerConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("tls", &self.tls)
            .field("public_base_url", &self.public_base_url)
            .field("static_dir", &self.static_dir)
            .field("twilio_account_sid", &self.twilio_account_sid)
            .field("twilio_auth_token", &redact(&self.twilio_auth_token))
            .field("twilio_phone_number", &self.twilio_phone_number)
            .field("to_phone_number", &self.to_phone_number)
            .field("twilio_api_base_url", &self.twilio_api_base_url)
            .field("twilio_validate_signatures", &self.twilio_validate_signatures)
            .field("groq_api_key", &redact(&self.groq_api_key))
            .field("groq_base_url", &self.groq_base_url)
            .field("groq_model", &self.groq_model)
            .field("llm_timeout", &self.llm_timeout)
            .field("voice_name", &self.voice_name)
            .field("voice_language", &self.voice_language)
            .field("gather_timeout_seconds", &self.gather_timeout_seconds)
            .field("max_silent_reprompts", &self.max_silent_reprompts)
            .field("cors_allowed_origins", &self.cors_allowed_origins)
            .field(
                "rate_limit_requests_per_second",
                &self.rate_limit_requests_per_second,
            )
            .field("rate_limit_burst_size", &self.rate_limit_burst_size)
            .finish()
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        let style = VoiceStyle::default();
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            tls: None,
            public_base_url: None,
            static_dir: PathBuf::from("static"),
            twilio_account_sid: None,
            twilio_auth_token: None,
            twilio_phone_number: None,
            to_phone_number: None,
            twilio_api_base_url: TWILIO_API_BASE_URL.to_string(),
            twilio_validate_signatures: false,
            groq_api_key: None,
            groq_base_url: GROQ_API_BASE_URL.to_string(),
            groq_model: DEFAULT_MODEL.to_string(),
            llm_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            voice_name: style.voice,
            voice_language: style.language,
            gather_timeout_seconds: DEFAULT_GATHER_TIMEOUT_SECS,
            max_silent_reprompts: DEFAULT_MAX_SILENT_REPROMPTS,
            cors_allowed_origins: None,
            rate_limit_requests_per_second: 60,
            rate_limit_burst_size: 10,
        }
    }
}

/// Implement Drop to zeroize all secret fields when ServerConfig is dropped.
impl Drop for ServerConfig {
    fn drop(&mut self) {
        use zeroize::Zeroize;

        if let Some(ref mut token) = self.twilio_auth_token {
            token.zeroize();
        }
        if let Some(ref mut key) = self.groq_api_key {
            key.zeroize();
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables (and `.env`, loaded by `main`)
    ///
    /// # Errors
    /// Returns an error if a variable has an invalid format or validation fails.
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        let mut config = merge::merge_config(None)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a YAML file with environment variable base
    ///
    /// Priority order (highest to lowest):
    /// 1. YAML file values
    /// 2. Environment variables (actual ENV vars override .env values)
    /// 3. .env file values
    /// 4. Default values
    ///
    /// # Errors
    /// Returns an error if:
    /// - The YAML file cannot be read or is malformed
    /// - Environment variables have invalid formats
    /// - Configuration validation fails
    pub fn from_file(path: &PathBuf) -> Result<Self, Box<dyn std::error::Error>> {
        let yaml_config = yaml::YamlConfig::from_file(path)?;
        let mut config = merge::merge_config(Some(yaml_config))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the merged configuration, normalizing the public base URL.
    pub fn validate(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        self.public_base_url = validation::validate_public_base_url_config(&self.public_base_url)?;
        validation::validate_phone_numbers(&self.twilio_phone_number, &self.to_phone_number)?;
        validation::validate_signature_settings(
            self.twilio_validate_signatures,
            &self.twilio_auth_token,
            &self.public_base_url,
        )?;
        validation::validate_llm_timeout(self.llm_timeout)?;
        validation::validate_gather_timeout(self.gather_timeout_seconds)?;
        Ok(())
    }

    /// Get the server address as a string
    ///
    /// Returns the address in the format "host:port"
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Check if TLS is enabled
    pub fn is_tls_enabled(&self) -> bool {
        self.tls.is_some()
    }

    /// Absolute public URL for `path`, if a public base URL is configured
    pub fn public_url(&self, path: &str) -> Option<String> {
        self.public_base_url
            .as_deref()
            .map(|base| join_public_url(base, path))
    }

    /// Twilio REST settings, if both account SID and auth token are set
    pub fn twilio_config(&self) -> Option<TwilioConfig> {
        let sid = self.twilio_account_sid.as_ref()?;
        let token = self.twilio_auth_token.as_ref()?;
        Some(TwilioConfig {
            api_base_url: self.twilio_api_base_url.clone(),
            ..TwilioConfig::new(sid.clone(), token.clone())
        })
    }

    /// Groq settings; an unset key yields an empty one, and every reply
    /// then falls back.
    pub fn groq_config(&self) -> GroqChatConfig {
        GroqChatConfig {
            base_url: self.groq_base_url.clone(),
            model: self.groq_model.clone(),
            timeout: self.llm_timeout,
            ..GroqChatConfig::new(self.groq_api_key.clone().unwrap_or_default())
        }
    }

    pub fn agent_settings(&self) -> AgentSettings {
        AgentSettings {
            style: VoiceStyle {
                voice: self.voice_name.clone(),
                language: self.voice_language.clone(),
                ..VoiceStyle::default()
            },
            gather_timeout_secs: self.gather_timeout_seconds,
            max_silent_reprompts: self.max_silent_reprompts,
        }
    }

    /// Rate limiting is switched off at 100000 requests per second and above
    pub fn rate_limiting_enabled(&self) -> bool {
        self.rate_limit_requests_per_second < 100_000
    }
}
