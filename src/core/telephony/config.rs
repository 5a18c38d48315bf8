//! Twilio REST API configuration.

use std::time::Duration;

use zeroize::Zeroizing;

/// Twilio REST API base URL.
pub const TWILIO_API_BASE_URL: &str = "https://api.twilio.com";

/// Twilio REST API version segment.
pub const TWILIO_API_VERSION: &str = "2010-04-01";

/// Default request timeout for call creation.
pub const DEFAULT_TIMEOUT_SECS: u64 = 15;

/// Credentials and endpoint for the Twilio Calls API.
#[derive(Clone)]
pub struct TwilioConfig {
    /// Account SID (`AC...`), also the basic-auth username.
    pub account_sid: String,
    /// Auth token, the basic-auth password. Wiped on drop.
    pub auth_token: Zeroizing<String>,
    /// API base URL without a trailing slash.
    pub api_base_url: String,
    /// Request timeout.
    pub timeout: Duration,
}

impl std::fmt::Debug for TwilioConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TwilioConfig")
            .field("account_sid", &self.account_sid)
            .field("auth_token", &"<redacted>")
            .field("api_base_url", &self.api_base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl TwilioConfig {
    pub fn new(account_sid: impl Into<String>, auth_token: impl Into<String>) -> Self {
        Self {
            account_sid: account_sid.into(),
            auth_token: Zeroizing::new(auth_token.into()),
            api_base_url: TWILIO_API_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// URL of the Calls resource for this account.
    pub fn calls_url(&self) -> String {
        format!(
            "{}/{}/Accounts/{}/Calls.json",
            self.api_base_url.trim_end_matches('/'),
            TWILIO_API_VERSION,
            self.account_sid
        )
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.account_sid.trim().is_empty() {
            return Err("Twilio account SID must not be empty".to_string());
        }
        if self.auth_token.trim().is_empty() {
            return Err("Twilio auth token must not be empty".to_string());
        }
        Ok(())
    }
}
