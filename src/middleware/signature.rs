//! Twilio webhook signature validation middleware
//!
//! Enabled with `TWILIO_VALIDATE_SIGNATURES=true`. The signed URL is
//! `PUBLIC_BASE_URL` followed by the request path and query.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::{Request, State},
    http::header::CONTENT_TYPE,
    middleware::Next,
    response::Response,
};
use http_body_util::BodyExt;

use crate::core::telephony::{SIGNATURE_HEADER, SignatureError, verify_signature};
use crate::errors::{AppError, AppResult};
use crate::state::AppState;
use crate::utils::join_public_url;

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Reject webhooks whose `X-Twilio-Signature` does not match.
///
/// Returns 403 on a missing or invalid signature. The buffered body is
/// handed on to the handler unchanged.
pub async fn twilio_signature_middleware(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> AppResult<Response> {
    if !state.config.twilio_validate_signatures {
        return Ok(next.run(request).await);
    }

    let auth_token = state.config.twilio_auth_token.as_deref().ok_or_else(|| {
        AppError::Configuration("Signature validation requires TWILIO_AUTH_TOKEN".to_string())
    })?;
    let base_url = state.config.public_base_url.as_deref().ok_or_else(|| {
        AppError::Configuration("Signature validation requires PUBLIC_BASE_URL".to_string())
    })?;

    let signature = request
        .headers()
        .get(SIGNATURE_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
        .ok_or(SignatureError::Missing)?;

    let path_and_query = request
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or("/");
    let url = join_public_url(base_url, path_and_query);

    let is_form = request
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.starts_with(FORM_CONTENT_TYPE));

    let (parts, body) = request.into_parts();
    let body_bytes = body
        .collect()
        .await
        .map_err(|e| AppError::BadRequest(format!("Failed to read request body: {e}")))?
        .to_bytes();

    let params: Vec<(String, String)> = if is_form {
        url::form_urlencoded::parse(&body_bytes)
            .into_owned()
            .collect()
    } else {
        Vec::new()
    };

    if let Err(e) = verify_signature(auth_token, &url, &params, &signature) {
        tracing::warn!(path = %parts.uri.path(), url = %url, "Twilio signature validation failed");
        return Err(e.into());
    }

    tracing::debug!(path = %parts.uri.path(), "Twilio signature verified");
    let request = Request::from_parts(parts, Body::from(body_bytes));
    Ok(next.run(request).await)
}
