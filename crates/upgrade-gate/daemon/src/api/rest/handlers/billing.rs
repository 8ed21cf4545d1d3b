//! Billing relay handlers
//!
//! The billing surface posts its messages here; this is the only writer of
//! the subscription state.

use crate::api::rest::state::AppState;
use axum::{extract::State, Json};
use serde::Serialize;
use serde_json::Value;
use upgrade_gate_core::MessageOutcome;
use upgrade_gate_types::{OutboundReply, SubscriptionState};

/// Result of relaying one billing message
#[derive(Debug, Serialize)]
pub struct BillingMessageResponse {
    /// Whether the host understood the message
    pub accepted: bool,

    /// Reply to post back to the billing surface, if any
    pub reply: Option<OutboundReply>,
}

/// Relay a message from the billing surface
pub async fn post_billing_message(
    State(state): State<AppState>,
    Json(message): Json<Value>,
) -> Json<BillingMessageResponse> {
    let outcome = state.gate.billing().handle_message(&message).await;

    let reply = match &outcome {
        MessageOutcome::Reply(reply) => Some(reply.clone()),
        _ => None,
    };

    Json(BillingMessageResponse {
        accepted: !outcome.is_ignored(),
        reply,
    })
}

/// Current subscription state
pub async fn get_subscription(State(state): State<AppState>) -> Json<SubscriptionState> {
    Json(state.gate.store().current())
}

/// End the session; the state returns to `unknown`
pub async fn end_session(State(state): State<AppState>) -> Json<SubscriptionState> {
    state.gate.store().reset();
    tracing::info!("Session ended, subscription state reset");
    Json(state.gate.store().current())
}
