//! Gate decision handler

use crate::api::rest::state::AppState;
use crate::error::{ApiError, ApiResult};
use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use upgrade_gate_core::{
    BillingSurface, ComponentShellStack, Interception, LegacyShellStack, NavigationRequest,
};
use upgrade_gate_types::GateDecision;
use uuid::Uuid;

/// Which navigation stack a location belongs to
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StackKind {
    Legacy,
    #[default]
    Component,
}

/// Query for a gate decision
#[derive(Debug, Deserialize)]
pub struct DecisionQuery {
    pub location: String,
    #[serde(default)]
    pub stack: StackKind,
}

/// Gate decision with the surface to show when blocked
#[derive(Debug, Serialize)]
pub struct DecisionResponse {
    pub request_id: Uuid,
    pub stack: String,
    pub location: String,
    pub decision: GateDecision,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub surface: Option<BillingSurface>,
}

/// Decision the named stack's interceptor produces now
pub async fn get_decision(
    State(state): State<AppState>,
    Query(query): Query<DecisionQuery>,
) -> ApiResult<Json<DecisionResponse>> {
    if query.location.trim().is_empty() {
        return Err(ApiError::BadRequest("location must not be empty".into()));
    }

    let request_id = Uuid::new_v4();
    let request = NavigationRequest::direct(query.location.clone());
    let (stack, interception) = match query.stack {
        StackKind::Legacy => (LegacyShellStack::NAME, state.legacy.intercept(&request)),
        StackKind::Component => (
            ComponentShellStack::NAME,
            state.component.intercept(&request),
        ),
    };

    tracing::debug!(
        request_id = %request_id,
        stack,
        location = %query.location,
        outcome = ?interception.decision().outcome,
        "Gate decision requested"
    );

    let (decision, surface) = match interception {
        Interception::Proceed { decision } => (decision, None),
        Interception::Lockout { decision, surface } => (decision, Some(surface)),
    };

    Ok(Json(DecisionResponse {
        request_id,
        stack: stack.to_string(),
        location: query.location,
        decision,
        surface,
    }))
}
