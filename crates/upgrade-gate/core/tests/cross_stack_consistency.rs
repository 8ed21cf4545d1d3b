//! Property tests: both navigation stacks reach the same decision.
//!
//! The legacy server-routed shell and the component-routed shell normalize
//! different path syntax, but for the same destination, state and flag they
//! must never disagree.

use chrono::Utc;
use proptest::prelude::*;
use serde_json::json;
use upgrade_gate_core::{
    ComponentShellStack, ForceUpgradeGate, GateConfig, GateDecisionEngine, GateOutcome,
    LegacyShellStack, NavigationRequest, RouteAllowlist, RouteIdentifier, SubscriptionState,
    SubscriptionStatus,
};

// ---------------------------------------------------------------------------
// Strategies
// ---------------------------------------------------------------------------

fn arb_status() -> impl Strategy<Value = SubscriptionStatus> {
    prop_oneof![
        Just(SubscriptionStatus::Active),
        Just(SubscriptionStatus::Trialing),
        Just(SubscriptionStatus::PastDue),
        Just(SubscriptionStatus::Canceled),
        Just(SubscriptionStatus::Unpaid),
        Just(SubscriptionStatus::Incomplete),
        Just(SubscriptionStatus::IncompleteExpired),
        "[a-z_]{3,12}".prop_map(|raw| SubscriptionStatus::from(raw.as_str())),
    ]
}

fn arb_state() -> impl Strategy<Value = SubscriptionState> {
    prop_oneof![
        Just(SubscriptionState::Unknown),
        (arb_status(), any::<bool>())
            .prop_map(|(status, trial)| SubscriptionState::known(status, trial)),
    ]
}

fn arb_route() -> impl Strategy<Value = RouteIdentifier> {
    prop::sample::select(RouteIdentifier::KNOWN.to_vec())
}

fn arb_gated_route() -> impl Strategy<Value = RouteIdentifier> {
    let gated: Vec<_> = RouteIdentifier::KNOWN
        .iter()
        .copied()
        .chain(std::iter::once(RouteIdentifier::Unmapped))
        .filter(|r| !RouteAllowlist::is_exempt(*r))
        .collect();
    prop::sample::select(gated)
}

fn arb_suffix() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(String::new()),
        Just("/".to_string()),
        "/[a-z0-9-]{1,10}".prop_map(|s| s),
        "/[a-z0-9-]{1,10}/[a-z0-9-]{1,10}".prop_map(|s| s),
        "\\?[a-z]{1,5}=[a-z0-9]{1,5}".prop_map(|s| s),
    ]
}

fn gate_with(state: &SubscriptionState, force_upgrade: bool) -> ForceUpgradeGate {
    let gate = ForceUpgradeGate::builder()
        .config(GateConfig {
            force_upgrade,
            ..Default::default()
        })
        .build()
        .unwrap();
    if let Some(subscription) = state.subscription() {
        gate.store().update(&json!({
            "subscription": {
                "isActiveTrial": subscription.is_active_trial,
                "status": subscription.status.as_str(),
            }
        }));
    }
    gate
}

// ---------------------------------------------------------------------------
// Engine properties
// ---------------------------------------------------------------------------

proptest! {
    /// Allowlisted routes are always reachable.
    #[test]
    fn allowlisted_routes_always_allowed(
        state in arb_state(),
        index in 0usize..3,
    ) {
        let route = RouteAllowlist::entries()[index];
        prop_assert!(GateDecisionEngine::decide(&state, route, true).is_allowed());
    }

    /// Past-due accounts are blocked from everything else.
    #[test]
    fn past_due_blocks_gated_routes(route in arb_gated_route(), trial in any::<bool>()) {
        let state = SubscriptionState::known(SubscriptionStatus::PastDue, trial);
        prop_assert!(GateDecisionEngine::decide(&state, route, true).is_blocked());
    }

    /// With the feature off the gate is a no-op.
    #[test]
    fn feature_off_is_global_noop(state in arb_state(), route in arb_route()) {
        prop_assert!(GateDecisionEngine::decide(&state, route, false).is_allowed());
    }

    /// Same inputs, same decision.
    #[test]
    fn decide_is_idempotent(state in arb_state(), route in arb_route(), flag in any::<bool>()) {
        let at = Utc::now();
        prop_assert_eq!(
            GateDecisionEngine::decide_at(&state, route, flag, at),
            GateDecisionEngine::decide_at(&state, route, flag, at)
        );
    }
}

// ---------------------------------------------------------------------------
// Cross-stack properties
// ---------------------------------------------------------------------------

proptest! {
    /// Both stacks agree for every destination reachable from both.
    #[test]
    fn stacks_agree_on_every_route(
        state in arb_state(),
        flag in any::<bool>(),
        route in arb_route(),
        suffix in arb_suffix(),
    ) {
        let gate = gate_with(&state, flag);
        let legacy = gate.interceptor(LegacyShellStack::default());
        let component = gate.interceptor(ComponentShellStack);

        let legacy_location = format!("/ghost/{}{}", route.as_str(), suffix);
        let component_location = format!("#/{}{}", route.as_str(), suffix);

        let from_legacy = legacy.intercept(&NavigationRequest::direct(legacy_location));
        let from_component = component.intercept(&NavigationRequest::sidebar(component_location));

        prop_assert_eq!(from_legacy.route(), route);
        prop_assert_eq!(from_component.route(), route);
        prop_assert_eq!(from_legacy.decision().outcome, from_component.decision().outcome);
        prop_assert_eq!(from_legacy.decision().reason, from_component.decision().reason);
    }

    /// Every alias resolves the same way through both stacks, in path and
    /// fragment form.
    #[test]
    fn aliases_agree_with_canonical_names(
        state in arb_state(),
        flag in any::<bool>(),
        suffix in arb_suffix(),
    ) {
        let gate = gate_with(&state, flag);
        let legacy = gate.interceptor(LegacyShellStack::default());
        let component = gate.interceptor(ComponentShellStack);

        let aliases = [
            ("settings-x", RouteIdentifier::Settings),
            ("activitypub", RouteIdentifier::Network),
            ("stats", RouteIdentifier::Analytics),
        ];
        for (alias, canonical) in aliases {
            let expected = component.intercept(&NavigationRequest::direct(format!(
                "#/{}{}",
                canonical.as_str(),
                suffix
            )));
            let locations = [
                (true, format!("/ghost/{}{}", alias, suffix)),
                (true, format!("/ghost/#/{}{}", alias, suffix)),
                (false, format!("#/{}{}", alias, suffix)),
                (false, format!("{}{}", alias, suffix)),
            ];
            for (is_legacy, location) in locations {
                let request = NavigationRequest::direct(location);
                let got = if is_legacy {
                    legacy.intercept(&request)
                } else {
                    component.intercept(&request)
                };
                prop_assert_eq!(got.route(), canonical);
                prop_assert_eq!(got.decision().outcome, expected.decision().outcome);
                prop_assert_eq!(got.decision().reason, expected.decision().reason);
            }
        }
    }

    /// Locations nobody recognizes never leak access while the gate is on.
    #[test]
    fn unmapped_locations_fail_closed(
        state in arb_state(),
        junk in "[a-z]{1,3}-[a-z0-9]{4,10}",
    ) {
        let gate = gate_with(&state, true);
        let legacy = gate.interceptor(LegacyShellStack::default());
        let component = gate.interceptor(ComponentShellStack);

        let a = legacy.intercept(&NavigationRequest::direct(format!("/ghost/{}", junk)));
        let b = component.intercept(&NavigationRequest::direct(format!("#/{}", junk)));
        prop_assert_eq!(a.decision().outcome, GateOutcome::Block);
        prop_assert_eq!(b.decision().outcome, GateOutcome::Block);
    }
}
