use axum::Json;
use serde::Serialize;

/// Liveness message returned by `GET /`
pub const LIVENESS_MESSAGE: &str = "Insurance AI Assistant is running.";

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub message: &'static str,
}

/// Health check handler
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "OK",
        message: LIVENESS_MESSAGE,
    })
}
