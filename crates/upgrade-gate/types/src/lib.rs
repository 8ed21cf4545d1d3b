//! # Upgrade Gate Types
//!
//! Shared vocabulary for the forced-upgrade access gate.
//!
//! Every navigation stack in the admin application speaks its own path
//! syntax, but all of them reduce a location to a [`RouteIdentifier`] before
//! asking for a [`GateDecision`]. Keeping these types in one crate is what
//! lets the legacy server-routed shell and the component-routed shell share
//! a single allowlist and a single decision engine.
//!
//! ## Key Types
//!
//! - [`RouteIdentifier`]: normalized, stack-agnostic destination key
//! - [`SubscriptionState`]: latest billing status pushed by the billing surface
//! - [`GateDecision`]: outcome of one gate evaluation
//! - [`InboundMessage`] / [`OutboundReply`]: billing surface message contract

#![deny(unsafe_code)]
#![cfg_attr(feature = "strict-docs", warn(missing_docs))]
#![cfg_attr(not(feature = "strict-docs"), allow(missing_docs))]

pub mod decision;
pub mod message;
pub mod route;
pub mod subscription;

pub use decision::{DecisionReason, GateDecision, GateOutcome};
pub use message::{BillingRequest, ForceUpgradeInfo, InboundMessage, OutboundReply, OwnerUser};
pub use route::{ParseRouteError, RouteIdentifier};
pub use subscription::{Subscription, SubscriptionPayload, SubscriptionState, SubscriptionStatus};
