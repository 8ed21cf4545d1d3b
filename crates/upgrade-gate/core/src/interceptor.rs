//! Navigation interceptors
//!
//! One [`NavigationInterceptor`] exists per navigation stack. It is a thin
//! adapter: normalize the target location with the stack's
//! [`NavigationStack`], then ask the shared [`GateDecisionEngine`] using the
//! shared store and live config as they are at that moment.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use upgrade_gate_types::{GateDecision, RouteIdentifier};

use crate::billing::BillingSurface;
use crate::engine::GateDecisionEngine;
use crate::gate::ForceUpgradeGate;
use crate::stack::NavigationStack;

/// How a navigation was started.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NavigationTrigger {
    Sidebar,
    DirectUrl,
    /// Browser back or forward
    History,
    Redirect,
    Reload,
}

/// A navigation attempt entering a stack.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationRequest {
    pub location: String,
    pub trigger: NavigationTrigger,
}

impl NavigationRequest {
    pub fn new(location: impl Into<String>, trigger: NavigationTrigger) -> Self {
        Self {
            location: location.into(),
            trigger,
        }
    }

    pub fn sidebar(location: impl Into<String>) -> Self {
        Self::new(location, NavigationTrigger::Sidebar)
    }

    pub fn direct(location: impl Into<String>) -> Self {
        Self::new(location, NavigationTrigger::DirectUrl)
    }

    pub fn redirect(location: impl Into<String>) -> Self {
        Self::new(location, NavigationTrigger::Redirect)
    }
}

/// Verdict handed back to the stack before it commits a transition.
#[derive(Debug, Clone, PartialEq)]
pub enum Interception {
    /// Commit the transition normally
    Proceed { decision: GateDecision },
    /// Do not commit; show the billing surface instead
    Lockout {
        decision: GateDecision,
        surface: BillingSurface,
    },
}

impl Interception {
    pub fn decision(&self) -> &GateDecision {
        match self {
            Self::Proceed { decision } | Self::Lockout { decision, .. } => decision,
        }
    }

    pub fn route(&self) -> RouteIdentifier {
        self.decision().route
    }

    pub fn is_lockout(&self) -> bool {
        matches!(self, Self::Lockout { .. })
    }
}

/// Gate adapter for one navigation stack.
#[derive(Debug, Clone)]
pub struct NavigationInterceptor<S> {
    stack: S,
    gate: ForceUpgradeGate,
}

impl<S: NavigationStack> NavigationInterceptor<S> {
    pub fn new(stack: S, gate: ForceUpgradeGate) -> Self {
        Self { stack, gate }
    }

    pub fn stack(&self) -> &S {
        &self.stack
    }

    pub fn gate(&self) -> &ForceUpgradeGate {
        &self.gate
    }

    /// Evaluate a navigation before the stack commits it.
    pub fn intercept(&self, request: &NavigationRequest) -> Interception {
        let route = self.stack.normalize(&request.location);
        let state = self.gate.store().current();
        let force_upgrade = self.gate.config().force_upgrade();
        let decision = GateDecisionEngine::decide(&state, route, force_upgrade);

        if decision.is_allowed() {
            debug!(
                stack = self.stack.name(),
                route = %route,
                reason = ?decision.reason,
                "Navigation allowed"
            );
            return Interception::Proceed { decision };
        }

        info!(
            stack = self.stack.name(),
            location = %request.location,
            route = %route,
            trigger = ?request.trigger,
            reason = ?decision.reason,
            "Navigation blocked by forced-upgrade gate"
        );
        let surface = self.gate.billing().surface(&decision);
        Interception::Lockout { decision, surface }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GateConfig;
    use crate::stack::{ComponentShellStack, LegacyShellStack};
    use serde_json::json;
    use upgrade_gate_types::DecisionReason;

    fn gate(force_upgrade: bool) -> ForceUpgradeGate {
        ForceUpgradeGate::builder()
            .config(GateConfig {
                force_upgrade,
                ..Default::default()
            })
            .build()
            .unwrap()
    }

    #[test]
    fn blocks_with_surface() {
        let gate = gate(true);
        gate.store().update(&json!({
            "subscription": { "isActiveTrial": false, "status": "past_due" }
        }));
        let interceptor = gate.interceptor(ComponentShellStack);

        let interception = interceptor.intercept(&NavigationRequest::sidebar("#/network"));
        let Interception::Lockout { decision, surface } = interception else {
            panic!("expected lockout");
        };
        assert_eq!(decision.route, RouteIdentifier::Network);
        assert_eq!(surface.blocked_route, RouteIdentifier::Network);
        assert_eq!(surface.title, "Billing");
    }

    #[test]
    fn reads_state_at_decision_time() {
        let gate = gate(true);
        let interceptor = gate.interceptor(LegacyShellStack::default());
        let request = NavigationRequest::direct("/ghost/tags");

        assert_eq!(
            interceptor.intercept(&request).decision().reason,
            DecisionReason::Pending
        );

        gate.store().update(&json!({
            "subscription": { "isActiveTrial": true, "status": "active" }
        }));
        assert!(!interceptor.intercept(&request).is_lockout());
    }

    #[test]
    fn reads_flag_at_decision_time() {
        let gate = gate(false);
        let interceptor = gate.interceptor(LegacyShellStack::default());
        let request = NavigationRequest::direct("/ghost/members");

        assert!(!interceptor.intercept(&request).is_lockout());
        gate.config().set_force_upgrade(true);
        assert!(interceptor.intercept(&request).is_lockout());
    }

    #[test]
    fn unmapped_location_fails_closed() {
        let gate = gate(true);
        gate.store().update(&json!({ "subscription": { "status": "canceled" } }));
        let interceptor = gate.interceptor(ComponentShellStack);
        let interception = interceptor.intercept(&NavigationRequest::redirect("#/mystery"));
        assert!(interception.is_lockout());
        assert_eq!(interception.route(), RouteIdentifier::Unmapped);
    }
}
