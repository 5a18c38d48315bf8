use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use super::{ServerConfig, TlsConfig};
use crate::core::agent::{DEFAULT_GATHER_TIMEOUT_SECS, DEFAULT_MAX_SILENT_REPROMPTS};
use crate::core::llm::{DEFAULT_MODEL, DEFAULT_TIMEOUT_SECS, GROQ_API_BASE_URL};
use crate::core::telephony::{TWILIO_API_BASE_URL, VoiceStyle};

/// Build a [`ServerConfig`] from environment variables and defaults.
///
/// Values from `.env` are already in the process environment by the time
/// this runs (`dotenvy` is called in `main`).
pub fn load_from_env() -> Result<ServerConfig, Box<dyn std::error::Error>> {
    let defaults = VoiceStyle::default();

    let tls = if parse_bool_or_default("TLS_ENABLED", false)? {
        let cert_path = env_optional("TLS_CERT_PATH")
            .ok_or("TLS_ENABLED is true but TLS_CERT_PATH is not set")?;
        let key_path = env_optional("TLS_KEY_PATH")
            .ok_or("TLS_ENABLED is true but TLS_KEY_PATH is not set")?;
        Some(TlsConfig {
            cert_path: PathBuf::from(cert_path),
            key_path: PathBuf::from(key_path),
        })
    } else {
        None
    };

    let llm_timeout_seconds = parse_or_default::<u64>("LLM_TIMEOUT_SECONDS", DEFAULT_TIMEOUT_SECS)?;

    Ok(ServerConfig {
        host: env_or_default("HOST", "0.0.0.0"),
        port: parse_or_default::<u16>("PORT", 8000)?,
        tls,
        public_base_url: env_optional("PUBLIC_BASE_URL"),
        static_dir: PathBuf::from(env_or_default("STATIC_DIR", "static")),

        twilio_account_sid: env_optional("TWILIO_ACCOUNT_SID"),
        twilio_auth_token: env_optional("TWILIO_AUTH_TOKEN"),
        twilio_phone_number: env_optional("TWILIO_PHONE_NUMBER"),
        to_phone_number: env_optional("TO_PHONE_NUMBER"),
        twilio_api_base_url: env_or_default("TWILIO_API_BASE_URL", TWILIO_API_BASE_URL),
        twilio_validate_signatures: parse_bool_or_default("TWILIO_VALIDATE_SIGNATURES", false)?,

        groq_api_key: env_optional("GROQ_API_KEY"),
        groq_base_url: env_or_default("GROQ_BASE_URL", GROQ_API_BASE_URL),
        groq_model: env_or_default("GROQ_MODEL", DEFAULT_MODEL),
        llm_timeout: Duration::from_secs(llm_timeout_seconds),

        voice_name: env_or_default("VOICE_NAME", &defaults.voice),
        voice_language: env_or_default("VOICE_LANGUAGE", &defaults.language),
        gather_timeout_seconds: parse_or_default::<u32>(
            "GATHER_TIMEOUT_SECONDS",
            DEFAULT_GATHER_TIMEOUT_SECS,
        )?,
        max_silent_reprompts: parse_or_default::<u32>(
            "MAX_SILENT_REPROMPTS",
            DEFAULT_MAX_SILENT_REPROMPTS,
        )?,

        cors_allowed_origins: env_optional("CORS_ALLOWED_ORIGINS"),
        rate_limit_requests_per_second: parse_or_default::<u32>(
            "RATE_LIMIT_REQUESTS_PER_SECOND",
            60,
        )?,
        rate_limit_burst_size: parse_or_default::<u32>("RATE_LIMIT_BURST_SIZE", 10)?,
    })
}

/// Read a variable, treating unset and blank the same.
pub(crate) fn env_optional(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn env_or_default(key: &str, default: &str) -> String {
    env_optional(key).unwrap_or_else(|| default.to_string())
}

fn parse_or_default<T>(key: &str, default: T) -> Result<T, Box<dyn std::error::Error>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env_optional(key) {
        Some(value) => value
            .parse::<T>()
            .map_err(|e| format!("Invalid value for {key}: '{value}' ({e})").into()),
        None => Ok(default),
    }
}

fn parse_bool_or_default(key: &str, default: bool) -> Result<bool, Box<dyn std::error::Error>> {
    match env_optional(key) {
        Some(value) => match value.to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            _ => Err(format!("Invalid boolean for {key}: '{value}'").into()),
        },
        None => Ok(default),
    }
}
