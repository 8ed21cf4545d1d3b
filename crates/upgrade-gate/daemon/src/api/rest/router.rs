//! API Router configuration

use super::handlers;
use super::state::AppState;
use axum::{
    http::{header, HeaderName, HeaderValue, Method},
    middleware,
    routing::{get, post, put},
    Router,
};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

/// Create the main router: REST API under `/api/v1` plus the gated admin shell
pub fn create_router(state: AppState) -> Router {
    // Billing relay, only from the billing surface
    let relay_routes = Router::new()
        .route("/billing/messages", post(handlers::post_billing_message))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            handlers::relay_guard,
        ));

    // Live config, operator only
    let operator_routes = Router::new()
        .route("/config", get(handlers::get_config))
        .route("/config/force-upgrade", put(handlers::set_force_upgrade))
        .route("/config/billing-url", put(handlers::set_billing_url))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            handlers::operator_guard,
        ));

    let api_routes = Router::new()
        // Health
        .route("/health", get(handlers::health_check))
        // Subscription state and session
        .route("/subscription", get(handlers::get_subscription))
        .route("/session/end", post(handlers::end_session))
        // Gate
        .route("/gate/decision", get(handlers::get_decision))
        .merge(relay_routes)
        .merge(operator_routes);

    let mount = state.legacy.stack().mount().trim_end_matches('/').to_string();
    let shell_routes = Router::new()
        .route(&mount, get(handlers::admin_page))
        .route(&format!("{}/", mount), get(handlers::admin_page))
        .route(&format!("{}/*rest", mount), get(handlers::admin_page))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            handlers::legacy_gate,
        ));

    Router::new()
        .nest("/api/v1", api_routes)
        .merge(shell_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&state))
        .with_state(state)
}

/// CORS for the billing surface's origin only, following the live billing URL
fn cors_layer(state: &AppState) -> CorsLayer {
    let state = state.clone();
    CorsLayer::new()
        .allow_origin(AllowOrigin::predicate(
            move |origin: &HeaderValue, _request| {
                handlers::origin_is_billing(&state, origin.to_str().ok())
            },
        ))
        .allow_methods([Method::GET, Method::POST, Method::PUT])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            HeaderName::from_static(handlers::RELAY_SECRET_HEADER),
        ])
}
