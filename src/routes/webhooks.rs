use axum::{Router, middleware, routing::post};
use tower_http::trace::TraceLayer;

use crate::core::agent::{GATHER_ACTION_PATH, INCOMING_CALL_PATH};
use crate::handlers::voice;
use crate::middleware::twilio_signature_middleware;
use crate::state::AppState;
use std::sync::Arc;

/// Create the Twilio voice webhook router
///
/// Requests pass through signature validation, which is a no-op unless
/// `TWILIO_VALIDATE_SIGNATURES` is enabled.
pub fn create_webhook_router(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route(INCOMING_CALL_PATH, post(voice::incoming_call))
        .route(GATHER_ACTION_PATH, post(voice::gather))
        .layer(middleware::from_fn_with_state(
            state,
            twilio_signature_middleware,
        ))
        .layer(TraceLayer::new_for_http())
}
