//! Server-routed admin shell
//!
//! Every page request under the admin mount passes [`legacy_gate`] before
//! its handler runs. A blocked request never reaches the page handler: it is
//! answered with `303 See Other` to the upgrade page, so the address bar
//! never settles on the blocked URL. The blocked route rides along as
//! `?from=<route>` so the upgrade page can name it.

use crate::api::rest::state::AppState;
use axum::{
    extract::{Query, Request, State},
    http::Uri,
    middleware::Next,
    response::{Html, IntoResponse, Redirect, Response},
    Extension,
};
use serde::Deserialize;
use upgrade_gate_core::{Interception, NavigationRequest, RouteLoader, RouteView};
use upgrade_gate_types::{GateDecision, RouteIdentifier};
use uuid::Uuid;

/// Gate middleware for the server-routed shell
pub async fn legacy_gate(State(state): State<AppState>, mut request: Request, next: Next) -> Response {
    let location = location_of(request.uri());

    match state.legacy.intercept(&NavigationRequest::direct(location.clone())) {
        Interception::Proceed { decision } => {
            request.extensions_mut().insert(decision);
            next.run(request).await
        }
        Interception::Lockout { decision, .. } => {
            let request_id = Uuid::new_v4();
            tracing::info!(
                request_id = %request_id,
                location = %location,
                route = %decision.route,
                reason = ?decision.reason,
                "Redirecting blocked admin request to upgrade page"
            );
            Redirect::to(&state.pro_path_from(decision.route)).into_response()
        }
    }
}

/// Query string of the upgrade page
#[derive(Debug, Default, Deserialize)]
pub struct UpgradeQuery {
    /// Route the visitor was turned away from
    pub from: Option<String>,
}

/// Admin page handler; only reached after [`legacy_gate`] allowed the request
pub async fn admin_page(
    State(state): State<AppState>,
    Extension(decision): Extension<GateDecision>,
    query: Option<Query<UpgradeQuery>>,
    uri: Uri,
) -> Html<String> {
    if decision.route == RouteIdentifier::Pro {
        let from = query.and_then(|Query(query)| query.from);
        let decision = blocked_decision(&state, from.as_deref()).unwrap_or(decision);
        return Html(upgrade_page(&state, &decision));
    }
    let view = state.pages.load(decision.route, &location_of(&uri));
    Html(view.body)
}

/// Decision for the route named in `?from=`, if that route is still blocked.
fn blocked_decision(state: &AppState, from: Option<&str>) -> Option<GateDecision> {
    let route = from?.parse::<RouteIdentifier>().ok()?;
    let decision = state.gate.decide(route);
    decision.is_blocked().then_some(decision)
}

fn upgrade_page(state: &AppState, decision: &GateDecision) -> String {
    if !state.gate.config().snapshot().billing.enabled {
        return AdminPages::document(
            RouteIdentifier::Pro,
            "<p>Billing is not available on this site.</p>",
        );
    }
    let billing = state.gate.billing();
    billing.render_html(&billing.surface(decision))
}

fn location_of(uri: &Uri) -> String {
    uri.path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| uri.path().to_string())
}

/// Minimal page renderer for the server-routed shell.
#[derive(Debug, Clone, Copy, Default)]
pub struct AdminPages;

impl AdminPages {
    fn document(route: RouteIdentifier, content: &str) -> String {
        format!(
            "<!DOCTYPE html>\n<html>\n<head><title>{route}</title></head>\n\
             <body>\n<main class=\"gh-main\" data-route=\"{route}\">\n{content}\n</main>\n</body>\n</html>\n",
        )
    }
}

impl RouteLoader for AdminPages {
    fn load(&self, route: RouteIdentifier, location: &str) -> RouteView {
        RouteView {
            route,
            location: location.to_string(),
            body: Self::document(route, &format!("<h1>{}</h1>", route)),
        }
    }
}
