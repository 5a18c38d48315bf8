use std::sync::Arc;

use axum::{
    Json,
    extract::{Query, State},
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::AppResult;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct CallQuery {
    /// Number to dial instead of the configured `TO_PHONE_NUMBER` (E.164)
    #[serde(default)]
    pub to: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CallInitiatedResponse {
    pub message: String,
    pub call_sid: String,
}

/// `GET /call`: dial the prospect and return the Twilio call SID.
///
/// Vendor failures are returned as JSON errors (502, or 503 when Twilio is
/// not configured).
pub async fn initiate_call(
    State(state): State<Arc<AppState>>,
    Query(query): Query<CallQuery>,
) -> AppResult<Json<CallInitiatedResponse>> {
    info!(to_override = query.to.is_some(), "Outbound call requested");

    let call_sid = state.place_outbound_call(query.to.as_deref()).await?;

    Ok(Json(CallInitiatedResponse {
        message: format!("Call initiated. Call SID: {call_sid}"),
        call_sid,
    }))
}
