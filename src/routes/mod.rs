pub mod api;
pub mod webhooks;

use std::sync::Arc;

use axum::{Router, routing::get};
use tower_http::services::ServeDir;

use crate::handlers;
use crate::state::AppState;

/// Assemble every route: liveness, webhooks, `/call` and `/static`.
///
/// Cross-cutting layers (CORS, rate limiting, security headers) are added
/// by the binary.
pub fn create_router(state: Arc<AppState>) -> Router {
    let public_routes = Router::new().route("/", get(handlers::api::health_check));

    public_routes
        .merge(webhooks::create_webhook_router(state.clone()))
        .merge(api::create_api_router())
        .nest_service("/static", ServeDir::new(&state.config.static_dir))
        .with_state(state)
}
