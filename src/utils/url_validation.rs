//! Validation for the public base URL Twilio uses to reach this server.
//!
//! The base URL is embedded in every outbound call request and is the
//! input to webhook signature checks, so it must be an absolute https
//! origin (optionally with a path prefix) that routes to the public
//! internet.

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use thiserror::Error;
use tracing::warn;
use url::Url;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum UrlValidationError {
    #[error("Invalid URL format: {0}")]
    InvalidFormat(#[from] url::ParseError),

    #[error("URL scheme must be HTTPS, got: {0}")]
    HttpsRequired(String),

    #[error("URL must have a host")]
    MissingHost,

    #[error("URL host is a private/internal IP address: {0}")]
    PrivateIpDetected(IpAddr),

    #[error("URL must not carry a query string or fragment")]
    QueryNotAllowed,
}

/// Loopback, RFC 1918, link-local, CGNAT, benchmarking, documentation,
/// broadcast and unspecified ranges.
pub fn is_private_ipv4(ip: &Ipv4Addr) -> bool {
    let [a, b, ..] = ip.octets();
    ip.is_loopback()
        || ip.is_private()
        || ip.is_link_local()
        || ip.is_broadcast()
        || ip.is_unspecified()
        || ip.is_documentation()
        || (a == 100 && (b & 0xC0) == 64)
        || (a == 198 && (b == 18 || b == 19))
}

/// Loopback, unspecified, link-local (fe80::/10), unique local (fc00::/7),
/// documentation (2001:db8::/32), and IPv4-mapped private addresses.
pub fn is_private_ipv6(ip: &Ipv6Addr) -> bool {
    let segments = ip.segments();
    if ip.is_loopback()
        || ip.is_unspecified()
        || segments[0] & 0xFFC0 == 0xFE80
        || segments[0] & 0xFE00 == 0xFC00
        || (segments[0] == 0x2001 && segments[1] == 0x0DB8)
    {
        return true;
    }
    ip.to_ipv4_mapped()
        .is_some_and(|ipv4| is_private_ipv4(&ipv4))
}

pub fn is_private_ip(ip: &IpAddr) -> bool {
    match ip {
        IpAddr::V4(ipv4) => is_private_ipv4(ipv4),
        IpAddr::V6(ipv6) => is_private_ipv6(ipv6),
    }
}

/// Validate and normalize a public base URL.
///
/// Returns the URL without a trailing slash, ready for
/// [`join_public_url`].
///
/// # Example
/// ```rust
/// use voice_sales_agent::utils::url_validation::validate_public_base_url;
///
/// assert_eq!(
///     validate_public_base_url("https://agent.example.com/").unwrap(),
///     "https://agent.example.com"
/// );
/// assert!(validate_public_base_url("http://agent.example.com").is_err());
/// ```
pub fn validate_public_base_url(url: &str) -> Result<String, UrlValidationError> {
    let parsed = Url::parse(url.trim())?;

    if parsed.scheme() != "https" {
        return Err(UrlValidationError::HttpsRequired(
            parsed.scheme().to_string(),
        ));
    }

    if parsed.query().is_some() || parsed.fragment().is_some() {
        return Err(UrlValidationError::QueryNotAllowed);
    }

    let ip = match parsed.host() {
        Some(url::Host::Ipv4(ip)) => Some(IpAddr::V4(ip)),
        Some(url::Host::Ipv6(ip)) => Some(IpAddr::V6(ip)),
        Some(url::Host::Domain(_)) => None,
        None => return Err(UrlValidationError::MissingHost),
    };
    if let Some(ip) = ip.filter(is_private_ip) {
        warn!(%ip, "Public base URL points at a private address");
        return Err(UrlValidationError::PrivateIpDetected(ip));
    }

    Ok(parsed.as_str().trim_end_matches('/').to_string())
}

/// Join a normalized base URL and an absolute path (`/incoming-call`).
pub fn join_public_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}
