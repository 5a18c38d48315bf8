//! Twilio webhook request signing.
//!
//! Twilio signs every webhook with `X-Twilio-Signature`:
//!
//! 1. Start from the full public URL of the request, query string included.
//! 2. For form POSTs, sort the parameters by name and append each name and
//!    value with no delimiters.
//! 3. HMAC-SHA1 the result with the account auth token and base64 it.

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use hmac::{Hmac, Mac};
use sha1::Sha1;
use subtle::ConstantTimeEq;
use thiserror::Error;

type HmacSha1 = Hmac<Sha1>;

/// Header carrying the request signature.
pub const SIGNATURE_HEADER: &str = "x-twilio-signature";

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SignatureError {
    #[error("Missing X-Twilio-Signature header")]
    Missing,

    #[error("Request signature does not match")]
    Mismatch,

    #[error("Invalid signing key")]
    InvalidKey,
}

/// Compute the expected signature for a request.
pub fn compute_signature(
    auth_token: &str,
    url: &str,
    params: &[(String, String)],
) -> Result<String, SignatureError> {
    let mut sorted: Vec<&(String, String)> = params.iter().collect();
    sorted.sort();

    let mut mac =
        HmacSha1::new_from_slice(auth_token.as_bytes()).map_err(|_| SignatureError::InvalidKey)?;
    mac.update(url.as_bytes());
    for (name, value) in sorted {
        mac.update(name.as_bytes());
        mac.update(value.as_bytes());
    }

    Ok(BASE64.encode(mac.finalize().into_bytes()))
}

/// Check `signature` against the expected value in constant time.
pub fn verify_signature(
    auth_token: &str,
    url: &str,
    params: &[(String, String)],
    signature: &str,
) -> Result<(), SignatureError> {
    let expected = compute_signature(auth_token, url, params)?;
    if bool::from(expected.as_bytes().ct_eq(signature.trim().as_bytes())) {
        Ok(())
    } else {
        Err(SignatureError::Mismatch)
    }
}
