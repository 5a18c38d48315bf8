use serde::Deserialize;
use std::path::PathBuf;

/// Complete YAML configuration structure
///
/// All fields are optional to allow partial configuration. Values present in
/// the file override environment variables.
///
/// # Example YAML structure
/// ```yaml
/// server:
///   host: "0.0.0.0"
///   port: 8000
///   public_base_url: "https://agent.example.com"
///   static_dir: "static"
///   tls:
///     enabled: true
///     cert_path: "/etc/agent/cert.pem"
///     key_path: "/etc/agent/key.pem"
///
/// twilio:
///   account_sid: "AC..."
///   auth_token: "your-auth-token"
///   from_number: "+15017122661"
///   to_number: "+15558675310"
///   validate_signatures: true
///
/// llm:
///   api_key: "gsk_..."
///   model: "llama3-8b-8192"
///   timeout_seconds: 8
///
/// agent:
///   voice: "Polly.Matthew"
///   language: "en-US"
///   gather_timeout_seconds: 3
///   max_silent_reprompts: 3
///
/// security:
///   cors_allowed_origins: "https://dashboard.example.com"
///   rate_limit_requests_per_second: 60
///   rate_limit_burst_size: 10
/// ```
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct YamlConfig {
    pub server: Option<ServerYaml>,
    pub twilio: Option<TwilioYaml>,
    pub llm: Option<LlmYaml>,
    pub agent: Option<AgentYaml>,
    pub security: Option<SecurityYaml>,
}

/// Server configuration from YAML
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct ServerYaml {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub tls: Option<TlsYaml>,
    /// Public https origin Twilio reaches this server on
    pub public_base_url: Option<String>,
    pub static_dir: Option<String>,
}

/// TLS configuration from YAML
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct TlsYaml {
    pub enabled: Option<bool>,
    pub cert_path: Option<String>,
    pub key_path: Option<String>,
}

/// Twilio account settings from YAML
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct TwilioYaml {
    pub account_sid: Option<String>,
    pub auth_token: Option<String>,
    /// Caller ID for outbound calls (E.164)
    pub from_number: Option<String>,
    /// Default number dialled by `/call` (E.164)
    pub to_number: Option<String>,
    pub api_base_url: Option<String>,
    pub validate_signatures: Option<bool>,
}

/// Groq settings from YAML
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct LlmYaml {
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub model: Option<String>,
    pub timeout_seconds: Option<u64>,
}

/// Voice and turn settings from YAML
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AgentYaml {
    pub voice: Option<String>,
    pub language: Option<String>,
    pub gather_timeout_seconds: Option<u32>,
    pub max_silent_reprompts: Option<u32>,
}

/// Security configuration from YAML
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct SecurityYaml {
    /// CORS allowed origins (comma-separated list or "*" for all)
    pub cors_allowed_origins: Option<String>,
    /// Maximum requests per second per IP address
    pub rate_limit_requests_per_second: Option<u32>,
    /// Maximum burst size for rate limiting
    pub rate_limit_burst_size: Option<u32>,
}

impl YamlConfig {
    /// Load configuration from a YAML file
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or the YAML is malformed.
    pub fn from_file(path: &PathBuf) -> Result<Self, Box<dyn std::error::Error>> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file {}: {e}", path.display()))?;

        let config: YamlConfig = serde_yaml::from_str(&contents)
            .map_err(|e| format!("Failed to parse YAML config: {e}"))?;

        Ok(config)
    }
}
