use axum::{Router, routing::get};
use tower_http::trace::TraceLayer;

use crate::handlers::calls;
use crate::state::AppState;
use std::sync::Arc;

/// Create the API router for operator-triggered actions
pub fn create_api_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/call", get(calls::initiate_call))
        .layer(TraceLayer::new_for_http())
}
