//! Twilio voice webhooks.
//!
//! Both handlers always answer with TwiML. A missing or malformed form is
//! treated as an empty webhook.

use std::sync::Arc;

use axum::{
    Form,
    extract::{Query, State, rejection::FormRejection, rejection::QueryRejection},
};
use serde::Deserialize;
use tracing::{debug, info};

use crate::core::telephony::{TwimlResponse, VoiceWebhook};
use crate::state::AppState;

/// Query parameters on the gather action URL
#[derive(Debug, Default, Deserialize)]
pub struct GatherQuery {
    /// Consecutive silent turns so far
    #[serde(default)]
    pub silent: u32,
}

fn webhook_or_default(form: Result<Form<VoiceWebhook>, FormRejection>) -> VoiceWebhook {
    match form {
        Ok(Form(webhook)) => webhook,
        Err(rejection) => {
            debug!(error = %rejection, "Unreadable webhook form, treating as empty");
            VoiceWebhook::default()
        }
    }
}

/// `POST /incoming-call`: greet the callee and start listening.
pub async fn incoming_call(
    State(state): State<Arc<AppState>>,
    form: Result<Form<VoiceWebhook>, FormRejection>,
) -> TwimlResponse {
    let webhook = webhook_or_default(form);
    info!(
        call_sid = %webhook.call_sid_or_unknown(),
        status = ?webhook.call_status,
        "Call answered, sending greeting"
    );

    TwimlResponse(state.agent.incoming_call())
}

/// `POST /gather`: handle one caller utterance.
pub async fn gather(
    State(state): State<Arc<AppState>>,
    query: Result<Query<GatherQuery>, QueryRejection>,
    form: Result<Form<VoiceWebhook>, FormRejection>,
) -> TwimlResponse {
    let silent = query.map(|Query(q)| q.silent).unwrap_or_default();
    let webhook = webhook_or_default(form);
    let call_sid = webhook.call_sid_or_unknown();

    info!(
        call_sid = %call_sid,
        confidence = ?webhook.confidence(),
        silent,
        "Caller said: {}",
        webhook.speech()
    );

    let response = state.agent.gather_turn(webhook.speech(), silent).await;
    info!(
        call_sid = %call_sid,
        outcome = ?response.outcome,
        "Responding: {}",
        response.spoken
    );

    TwimlResponse(response.twiml)
}
