//! Live gate settings handlers

use crate::api::rest::state::AppState;
use crate::error::ApiResult;
use axum::{extract::State, Json};
use serde::Deserialize;
use upgrade_gate_core::GateConfig;

/// Toggle forced-upgrade mode
#[derive(Debug, Deserialize)]
pub struct ForceUpgradeRequest {
    pub enabled: bool,
}

/// Move the billing surface
#[derive(Debug, Deserialize)]
pub struct BillingUrlRequest {
    pub url: String,
}

/// Current gate configuration
pub async fn get_config(State(state): State<AppState>) -> Json<GateConfig> {
    Json(state.gate.config().snapshot())
}

/// Turn forced-upgrade mode on or off
pub async fn set_force_upgrade(
    State(state): State<AppState>,
    Json(request): Json<ForceUpgradeRequest>,
) -> Json<GateConfig> {
    state.gate.config().set_force_upgrade(request.enabled);
    Json(state.gate.config().snapshot())
}

/// Change the billing surface base URL
pub async fn set_billing_url(
    State(state): State<AppState>,
    Json(request): Json<BillingUrlRequest>,
) -> ApiResult<Json<GateConfig>> {
    state.gate.config().set_billing_url(request.url)?;
    Ok(Json(state.gate.config().snapshot()))
}
