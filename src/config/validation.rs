use std::time::Duration;

use crate::core::llm::MAX_TIMEOUT_SECS;
use crate::utils::{validate_phone_number, validate_public_base_url};

/// Check the public base URL and return its normalized form.
pub fn validate_public_base_url_config(
    url: &Option<String>,
) -> Result<Option<String>, Box<dyn std::error::Error>> {
    match url {
        Some(url) => {
            let normalized = validate_public_base_url(url)
                .map_err(|e| format!("Invalid PUBLIC_BASE_URL '{url}': {e}"))?;
            Ok(Some(normalized))
        }
        None => Ok(None),
    }
}

/// Both configured numbers must be E.164 when present.
pub fn validate_phone_numbers(
    from: &Option<String>,
    to: &Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    for (name, number) in [("TWILIO_PHONE_NUMBER", from), ("TO_PHONE_NUMBER", to)] {
        if let Some(number) = number {
            validate_phone_number(number).map_err(|e| format!("Invalid {name}: {e}"))?;
        }
    }
    Ok(())
}

/// Signature validation needs the auth token (signing key) and the public
/// base URL (signed input).
pub fn validate_signature_settings(
    enabled: bool,
    auth_token: &Option<String>,
    public_base_url: &Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    if !enabled {
        return Ok(());
    }
    if auth_token.is_none() {
        return Err(
            "TWILIO_VALIDATE_SIGNATURES requires TWILIO_AUTH_TOKEN to be set".into(),
        );
    }
    if public_base_url.is_none() {
        return Err("TWILIO_VALIDATE_SIGNATURES requires PUBLIC_BASE_URL to be set".into());
    }
    Ok(())
}

/// Twilio abandons a webhook after 15 seconds, so the LLM request must
/// finish well inside that.
pub fn validate_llm_timeout(timeout: Duration) -> Result<(), Box<dyn std::error::Error>> {
    let secs = timeout.as_secs();
    if secs == 0 || secs > MAX_TIMEOUT_SECS {
        return Err(format!(
            "LLM_TIMEOUT_SECONDS must be between 1 and {MAX_TIMEOUT_SECS}, got {secs}"
        )
        .into());
    }
    Ok(())
}

pub fn validate_gather_timeout(secs: u32) -> Result<(), Box<dyn std::error::Error>> {
    if secs == 0 {
        return Err("GATHER_TIMEOUT_SECONDS must be at least 1".into());
    }
    Ok(())
}
