use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::core::telephony::{SignatureError, TelephonyError};

/// Errors surfaced by HTTP handlers and middleware.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Telephony(#[from] TelephonyError),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),
}

pub type AppResult<T> = Result<T, AppError>;

impl From<SignatureError> for AppError {
    fn from(err: SignatureError) -> Self {
        match err {
            SignatureError::InvalidKey => AppError::Configuration(err.to_string()),
            SignatureError::Missing | SignatureError::Mismatch => {
                AppError::Forbidden(err.to_string())
            }
        }
    }
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Telephony(TelephonyError::NotConfigured(_)) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            AppError::Telephony(TelephonyError::Configuration(_)) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::Telephony(_) => StatusCode::BAD_GATEWAY,
            AppError::Configuration(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), error = %self, "Request failed");
        } else {
            tracing::warn!(status = status.as_u16(), error = %self, "Request rejected");
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
