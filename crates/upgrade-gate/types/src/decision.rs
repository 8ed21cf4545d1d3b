//! Gate decision types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::route::RouteIdentifier;

/// Whether a navigation may proceed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GateOutcome {
    Allow,
    Block,
}

/// Why the gate reached its outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionReason {
    /// Forced-upgrade mode is off
    FeatureOff,
    /// Route is exempt from the gate
    Allowlisted,
    /// Subscription is active or in an active trial
    GoodStanding,
    /// Subscription is past due, canceled or otherwise not active
    BillingRestricted,
    /// No subscription message has arrived yet
    Pending,
}

impl DecisionReason {
    pub fn outcome(&self) -> GateOutcome {
        match self {
            Self::FeatureOff | Self::Allowlisted | Self::GoodStanding => GateOutcome::Allow,
            Self::BillingRestricted | Self::Pending => GateOutcome::Block,
        }
    }
}

/// Result of one gate evaluation.
///
/// Decisions are recomputed on every navigation attempt and never cached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GateDecision {
    pub outcome: GateOutcome,
    pub reason: DecisionReason,
    pub route: RouteIdentifier,
    pub evaluated_at: DateTime<Utc>,
}

impl GateDecision {
    /// Build a decision; the outcome follows from the reason.
    pub fn new(route: RouteIdentifier, reason: DecisionReason, evaluated_at: DateTime<Utc>) -> Self {
        Self {
            outcome: reason.outcome(),
            reason,
            route,
            evaluated_at,
        }
    }

    pub fn is_allowed(&self) -> bool {
        self.outcome == GateOutcome::Allow
    }

    pub fn is_blocked(&self) -> bool {
        self.outcome == GateOutcome::Block
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outcome_follows_reason() {
        let now = Utc::now();
        assert!(GateDecision::new(RouteIdentifier::Tags, DecisionReason::FeatureOff, now).is_allowed());
        assert!(GateDecision::new(RouteIdentifier::Pro, DecisionReason::Allowlisted, now).is_allowed());
        assert!(GateDecision::new(RouteIdentifier::Tags, DecisionReason::Pending, now).is_blocked());
        assert!(
            GateDecision::new(RouteIdentifier::Tags, DecisionReason::BillingRestricted, now)
                .is_blocked()
        );
    }

    #[test]
    fn serializes_snake_case() {
        let decision = GateDecision::new(
            RouteIdentifier::Network,
            DecisionReason::BillingRestricted,
            Utc::now(),
        );
        let json = serde_json::to_value(&decision).unwrap();
        assert_eq!(json["outcome"], "block");
        assert_eq!(json["reason"], "billing_restricted");
        assert_eq!(json["route"], "network");
    }
}
