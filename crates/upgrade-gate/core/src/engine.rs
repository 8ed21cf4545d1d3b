//! Gate decision engine
//!
//! Pure mapping from (subscription state, route, feature flag) to a
//! [`GateDecision`]. Evaluation order matters:
//!
//! 1. Forced-upgrade mode off: allow everything.
//! 2. Allowlisted route: allow, before looking at billing state, so an
//!    unresolved state can never strand the user away from sign-out.
//! 3. Billing state: good standing allows, any other known status blocks,
//!    and an unknown state blocks until the billing surface reports in.

use chrono::{DateTime, Utc};
use upgrade_gate_types::{DecisionReason, GateDecision, RouteIdentifier, SubscriptionState};

use crate::allowlist::RouteAllowlist;

/// The one decision engine shared by every navigation stack.
#[derive(Debug, Clone, Copy, Default)]
pub struct GateDecisionEngine;

impl GateDecisionEngine {
    /// Decide, stamped with the current time.
    pub fn decide(
        state: &SubscriptionState,
        route: RouteIdentifier,
        force_upgrade_enabled: bool,
    ) -> GateDecision {
        Self::decide_at(state, route, force_upgrade_enabled, Utc::now())
    }

    /// Decide with an explicit evaluation time.
    pub fn decide_at(
        state: &SubscriptionState,
        route: RouteIdentifier,
        force_upgrade_enabled: bool,
        evaluated_at: DateTime<Utc>,
    ) -> GateDecision {
        GateDecision::new(
            route,
            Self::reason(state, route, force_upgrade_enabled),
            evaluated_at,
        )
    }

    fn reason(
        state: &SubscriptionState,
        route: RouteIdentifier,
        force_upgrade_enabled: bool,
    ) -> DecisionReason {
        if !force_upgrade_enabled {
            return DecisionReason::FeatureOff;
        }
        if RouteAllowlist::is_exempt(route) {
            return DecisionReason::Allowlisted;
        }
        match state {
            SubscriptionState::Unknown => DecisionReason::Pending,
            SubscriptionState::Known(subscription) if subscription.is_in_good_standing() => {
                DecisionReason::GoodStanding
            }
            SubscriptionState::Known(_) => DecisionReason::BillingRestricted,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use upgrade_gate_types::{GateOutcome, SubscriptionStatus};

    fn past_due() -> SubscriptionState {
        SubscriptionState::known(SubscriptionStatus::PastDue, false)
    }

    #[test]
    fn feature_off_allows_everything() {
        for route in RouteIdentifier::KNOWN {
            let decision = GateDecisionEngine::decide(&past_due(), route, false);
            assert_eq!(decision.reason, DecisionReason::FeatureOff);
            assert!(decision.is_allowed());
        }
        let decision = GateDecisionEngine::decide(
            &SubscriptionState::Unknown,
            RouteIdentifier::Unmapped,
            false,
        );
        assert!(decision.is_allowed());
    }

    #[test]
    fn allowlist_wins_over_unknown_state() {
        let decision = GateDecisionEngine::decide(
            &SubscriptionState::Unknown,
            RouteIdentifier::Signout,
            true,
        );
        assert_eq!(decision.reason, DecisionReason::Allowlisted);
        assert!(decision.is_allowed());
    }

    #[test]
    fn unknown_state_fails_closed() {
        let decision =
            GateDecisionEngine::decide(&SubscriptionState::Unknown, RouteIdentifier::Network, true);
        assert_eq!(decision.outcome, GateOutcome::Block);
        assert_eq!(decision.reason, DecisionReason::Pending);
    }

    #[test]
    fn restricted_statuses_block() {
        for status in [
            SubscriptionStatus::PastDue,
            SubscriptionStatus::Canceled,
            SubscriptionStatus::Unpaid,
            SubscriptionStatus::Incomplete,
            SubscriptionStatus::IncompleteExpired,
            SubscriptionStatus::Trialing,
            SubscriptionStatus::Other("paused".into()),
        ] {
            let state = SubscriptionState::known(status, false);
            let decision = GateDecisionEngine::decide(&state, RouteIdentifier::Tags, true);
            assert_eq!(decision.reason, DecisionReason::BillingRestricted);
        }
    }

    #[test]
    fn good_standing_allows() {
        let active_trial = SubscriptionState::known(SubscriptionStatus::Active, true);
        let paid = SubscriptionState::known(SubscriptionStatus::Active, false);
        for state in [active_trial, paid] {
            let decision = GateDecisionEngine::decide(&state, RouteIdentifier::Analytics, true);
            assert_eq!(decision.reason, DecisionReason::GoodStanding);
        }
    }

    #[test]
    fn trialing_is_not_good_standing() {
        for trial in [true, false] {
            let state = SubscriptionState::known(SubscriptionStatus::Trialing, trial);
            let decision = GateDecisionEngine::decide(&state, RouteIdentifier::Analytics, true);
            assert!(decision.is_blocked());
            assert_eq!(decision.reason, DecisionReason::BillingRestricted);
        }
    }

    #[test]
    fn unmapped_route_is_not_exempt() {
        let decision = GateDecisionEngine::decide(&past_due(), RouteIdentifier::Unmapped, true);
        assert!(decision.is_blocked());
    }

    #[test]
    fn decide_at_is_idempotent() {
        let at = Utc::now();
        let first = GateDecisionEngine::decide_at(&past_due(), RouteIdentifier::Members, true, at);
        let second = GateDecisionEngine::decide_at(&past_due(), RouteIdentifier::Members, true, at);
        assert_eq!(first, second);
    }
}
