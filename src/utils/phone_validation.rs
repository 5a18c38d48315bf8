//! E.164 phone number checks for Twilio `To`/`From` parameters.

use thiserror::Error;

/// Maximum digits in an E.164 number, country code included.
const MAX_E164_DIGITS: usize = 15;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PhoneValidationError {
    #[error("Phone number must not be empty")]
    Empty,

    #[error("Phone number must start with '+' and a country code: {0}")]
    MissingPlus(String),

    #[error("Phone number must contain only digits after '+': {0}")]
    InvalidCharacter(String),

    #[error("Phone number must have 2 to 15 digits and not start with 0: {0}")]
    InvalidLength(String),
}

/// Validate an E.164 number such as `+15558675310`.
///
/// Returns the trimmed number.
pub fn validate_phone_number(number: &str) -> Result<&str, PhoneValidationError> {
    let number = number.trim();
    if number.is_empty() {
        return Err(PhoneValidationError::Empty);
    }

    let digits = number
        .strip_prefix('+')
        .ok_or_else(|| PhoneValidationError::MissingPlus(number.to_string()))?;

    if !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(PhoneValidationError::InvalidCharacter(number.to_string()));
    }

    if digits.len() < 2 || digits.len() > MAX_E164_DIGITS || digits.starts_with('0') {
        return Err(PhoneValidationError::InvalidLength(number.to_string()));
    }

    Ok(number)
}
