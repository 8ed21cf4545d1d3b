//! Request guards for the billing relay and the operator endpoints
//!
//! Relay messages move the subscription state and can read the identity
//! token, so they are only taken from the billing surface's origin and must
//! carry the relay secret. Live configuration needs the operator token.
//! An unset secret closes the endpoints it guards.

use crate::api::rest::state::AppState;
use crate::error::{ApiError, ApiResult};
use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};
use subtle::ConstantTimeEq;

/// Header carrying the relay secret
pub const RELAY_SECRET_HEADER: &str = "x-gate-relay-secret";

/// Guard for `POST /billing/messages`
pub async fn relay_guard(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> ApiResult<Response> {
    let headers = request.headers();
    let origin = headers
        .get(header::ORIGIN)
        .and_then(|value| value.to_str().ok());

    if !origin_is_billing(&state, origin) {
        tracing::warn!(origin = ?origin, "Rejected billing message from foreign origin");
        return Err(ApiError::Forbidden(
            "origin is not the billing surface".into(),
        ));
    }

    let Some(secret) = state.auth.relay_secret.as_deref() else {
        return Err(ApiError::Forbidden("billing relay is not configured".into()));
    };
    let presented = headers
        .get(RELAY_SECRET_HEADER)
        .map(|value| value.as_bytes());
    if !secret_matches(presented, secret) {
        tracing::warn!("Rejected billing message with bad relay secret");
        return Err(ApiError::Unauthorized(
            "missing or invalid relay secret".into(),
        ));
    }

    Ok(next.run(request).await)
}

/// Guard for the `/config` endpoints
pub async fn operator_guard(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> ApiResult<Response> {
    let Some(token) = state.auth.operator_token.as_deref() else {
        return Err(ApiError::Forbidden(
            "operator endpoints are not configured".into(),
        ));
    };
    if !secret_matches(bearer(request.headers()), token) {
        tracing::warn!(path = %request.uri().path(), "Rejected operator request");
        return Err(ApiError::Unauthorized(
            "missing or invalid operator token".into(),
        ));
    }

    Ok(next.run(request).await)
}

/// Whether `origin` is the origin of the live billing URL
pub fn origin_is_billing(state: &AppState, origin: Option<&str>) -> bool {
    match (origin, state.gate.config().billing_origin()) {
        (Some(origin), Some(expected)) => origin.eq_ignore_ascii_case(&expected),
        _ => false,
    }
}

fn bearer(headers: &HeaderMap) -> Option<&[u8]> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::as_bytes)
}

fn secret_matches(presented: Option<&[u8]>, expected: &str) -> bool {
    presented.is_some_and(|presented| bool::from(presented.ct_eq(expected.as_bytes())))
}
