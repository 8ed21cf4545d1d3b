//! Subscription state as reported by the billing surface

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Billing status of the account.
///
/// Statuses the gate has no special knowledge of are kept verbatim in
/// [`SubscriptionStatus::Other`]; the gate treats them as not in good standing.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SubscriptionStatus {
    Active,
    Trialing,
    PastDue,
    Canceled,
    Unpaid,
    Incomplete,
    IncompleteExpired,
    Other(String),
}

impl SubscriptionStatus {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Active => "active",
            Self::Trialing => "trialing",
            Self::PastDue => "past_due",
            Self::Canceled => "canceled",
            Self::Unpaid => "unpaid",
            Self::Incomplete => "incomplete",
            Self::IncompleteExpired => "incomplete_expired",
            Self::Other(raw) => raw,
        }
    }
}

impl From<&str> for SubscriptionStatus {
    fn from(raw: &str) -> Self {
        match raw {
            "active" => Self::Active,
            "trialing" => Self::Trialing,
            "past_due" => Self::PastDue,
            // both spellings show up in billing payloads
            "canceled" | "cancelled" => Self::Canceled,
            "unpaid" => Self::Unpaid,
            "incomplete" => Self::Incomplete,
            "incomplete_expired" => Self::IncompleteExpired,
            other => Self::Other(other.to_string()),
        }
    }
}

impl From<String> for SubscriptionStatus {
    fn from(raw: String) -> Self {
        Self::from(raw.as_str())
    }
}

impl From<SubscriptionStatus> for String {
    fn from(status: SubscriptionStatus) -> Self {
        status.as_str().to_string()
    }
}

impl fmt::Display for SubscriptionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Wire shape of the `subscription` field in a billing surface message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionPayload {
    #[serde(default)]
    pub is_active_trial: bool,
    pub status: String,
}

/// A subscription received from the billing surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subscription {
    pub is_active_trial: bool,
    pub status: SubscriptionStatus,
    pub last_updated_at: DateTime<Utc>,
}

impl Subscription {
    pub fn new(status: SubscriptionStatus, is_active_trial: bool) -> Self {
        Self {
            is_active_trial,
            status,
            last_updated_at: Utc::now(),
        }
    }

    /// Build from a wire payload, stamped with the receive time.
    pub fn from_payload(payload: SubscriptionPayload, received_at: DateTime<Utc>) -> Self {
        Self {
            is_active_trial: payload.is_active_trial,
            status: SubscriptionStatus::from(payload.status),
            last_updated_at: received_at,
        }
    }

    /// Whether this subscription grants general use of the application.
    ///
    /// Only `active` does, with or without an active trial.
    pub fn is_in_good_standing(&self) -> bool {
        self.status == SubscriptionStatus::Active
    }
}

/// Latest known billing state for the active account.
///
/// Starts as [`SubscriptionState::Unknown`] for every session; only messages
/// from the billing surface move it to [`SubscriptionState::Known`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum SubscriptionState {
    #[default]
    Unknown,
    Known(Subscription),
}

impl SubscriptionState {
    pub fn known(status: SubscriptionStatus, is_active_trial: bool) -> Self {
        Self::Known(Subscription::new(status, is_active_trial))
    }

    pub fn is_known(&self) -> bool {
        matches!(self, Self::Known(_))
    }

    pub fn subscription(&self) -> Option<&Subscription> {
        match self {
            Self::Known(subscription) => Some(subscription),
            Self::Unknown => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_round_trips_unknown_strings() {
        let status = SubscriptionStatus::from("paused");
        assert_eq!(status, SubscriptionStatus::Other("paused".into()));
        assert_eq!(status.as_str(), "paused");
    }

    #[test]
    fn cancelled_spelling_is_normalized() {
        assert_eq!(
            SubscriptionStatus::from("cancelled"),
            SubscriptionStatus::Canceled
        );
    }

    #[test]
    fn payload_defaults_trial_flag() {
        let payload: SubscriptionPayload =
            serde_json::from_value(serde_json::json!({ "status": "active" })).unwrap();
        assert!(!payload.is_active_trial);
        assert_eq!(payload.status, "active");
    }

    #[test]
    fn good_standing_rules() {
        assert!(Subscription::new(SubscriptionStatus::Active, false).is_in_good_standing());
        assert!(Subscription::new(SubscriptionStatus::Active, true).is_in_good_standing());
        assert!(!Subscription::new(SubscriptionStatus::Trialing, true).is_in_good_standing());
        assert!(!Subscription::new(SubscriptionStatus::Trialing, false).is_in_good_standing());
        assert!(!Subscription::new(SubscriptionStatus::PastDue, false).is_in_good_standing());
        assert!(!Subscription::new(SubscriptionStatus::Other("paused".into()), true)
            .is_in_good_standing());
    }

    #[test]
    fn state_serializes_with_tag() {
        let json = serde_json::to_value(SubscriptionState::Unknown).unwrap();
        assert_eq!(json, serde_json::json!({ "state": "unknown" }));

        let known = SubscriptionState::known(SubscriptionStatus::PastDue, false);
        let json = serde_json::to_value(&known).unwrap();
        assert_eq!(json["state"], "known");
        assert_eq!(json["status"], "past_due");
        assert_eq!(json["is_active_trial"], false);
    }
}
