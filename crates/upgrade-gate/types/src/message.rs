//! Billing surface message contract
//!
//! The billing surface is an external, versioned system that may emit
//! messages the gate does not understand. Parsing is therefore lenient:
//! anything that does not match a known shape is simply not a message.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::subscription::SubscriptionPayload;

/// Information requests the billing surface may send to its host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BillingRequest {
    #[serde(rename = "forceUpgradeInfo")]
    ForceUpgradeInfo,
    #[serde(rename = "token")]
    Token,
}

impl BillingRequest {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "forceUpgradeInfo" => Some(Self::ForceUpgradeInfo),
            "token" => Some(Self::Token),
            _ => None,
        }
    }
}

/// A recognized message from the billing surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundMessage {
    /// Subscription status update
    Subscription(SubscriptionPayload),
    /// Request for host-side context
    Request(BillingRequest),
    /// The surface moved to another of its own pages
    Route(String),
}

impl InboundMessage {
    /// Classify a raw message.
    ///
    /// A subscription payload takes precedence over a request, which takes
    /// precedence over a route change. Returns `None` for unrelated shapes.
    pub fn parse(raw: &Value) -> Option<Self> {
        let object = raw.as_object()?;

        if let Some(subscription) = object.get("subscription") {
            if let Ok(payload) = serde_json::from_value::<SubscriptionPayload>(subscription.clone())
            {
                return Some(Self::Subscription(payload));
            }
        }

        if let Some(request) = object
            .get("request")
            .and_then(Value::as_str)
            .and_then(BillingRequest::parse)
        {
            return Some(Self::Request(request));
        }

        object
            .get("route")
            .and_then(Value::as_str)
            .map(|route| Self::Route(route.to_string()))
    }
}

/// Site owner details shared with the billing surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnerUser {
    pub name: String,
    pub email: String,
}

/// Response body for a `forceUpgradeInfo` request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForceUpgradeInfo {
    pub force_upgrade: bool,
    pub is_owner: bool,
    pub owner_user: Option<OwnerUser>,
}

/// Reply posted back to the billing surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutboundReply {
    pub request: BillingRequest,
    pub response: Value,
}

impl OutboundReply {
    pub fn force_upgrade_info(info: &ForceUpgradeInfo) -> Self {
        Self {
            request: BillingRequest::ForceUpgradeInfo,
            response: serde_json::to_value(info).unwrap_or(Value::Null),
        }
    }

    /// Token reply; `None` is sent as `null` so the surface can stop waiting.
    pub fn token(token: Option<String>) -> Self {
        Self {
            request: BillingRequest::Token,
            response: token.map(Value::String).unwrap_or(Value::Null),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_subscription_payload() {
        let message = json!({
            "subscription": { "isActiveTrial": false, "status": "past_due" }
        });
        assert_eq!(
            InboundMessage::parse(&message),
            Some(InboundMessage::Subscription(SubscriptionPayload {
                is_active_trial: false,
                status: "past_due".into(),
            }))
        );
    }

    #[test]
    fn malformed_subscription_falls_through() {
        let message = json!({ "subscription": { "isActiveTrial": true } });
        assert_eq!(InboundMessage::parse(&message), None);

        let message = json!({ "subscription": "active" });
        assert_eq!(InboundMessage::parse(&message), None);
    }

    #[test]
    fn parses_requests_and_routes() {
        assert_eq!(
            InboundMessage::parse(&json!({ "request": "forceUpgradeInfo" })),
            Some(InboundMessage::Request(BillingRequest::ForceUpgradeInfo))
        );
        assert_eq!(
            InboundMessage::parse(&json!({ "request": "token" })),
            Some(InboundMessage::Request(BillingRequest::Token))
        );
        assert_eq!(
            InboundMessage::parse(&json!({ "route": "plans" })),
            Some(InboundMessage::Route("plans".into()))
        );
    }

    #[test]
    fn ignores_unrelated_shapes() {
        assert_eq!(InboundMessage::parse(&json!("hello")), None);
        assert_eq!(InboundMessage::parse(&json!({ "request": "secrets" })), None);
        assert_eq!(InboundMessage::parse(&json!({ "type": "resize" })), None);
    }

    #[test]
    fn replies_use_wire_names() {
        let reply = OutboundReply::token(Some("abc".into()));
        assert_eq!(
            serde_json::to_value(&reply).unwrap(),
            json!({ "request": "token", "response": "abc" })
        );

        let reply = OutboundReply::force_upgrade_info(&ForceUpgradeInfo {
            force_upgrade: true,
            is_owner: false,
            owner_user: Some(OwnerUser {
                name: "Owner".into(),
                email: "owner@example.com".into(),
            }),
        });
        let json = serde_json::to_value(&reply).unwrap();
        assert_eq!(json["request"], "forceUpgradeInfo");
        assert_eq!(json["response"]["forceUpgrade"], true);
        assert_eq!(json["response"]["ownerUser"]["email"], "owner@example.com");
    }
}
