//! # Upgrade Gate
//!
//! Forced-upgrade access gate for the admin application.
//!
//! When forced-upgrade mode is on, a signed-in user whose account is not in
//! good billing standing may only reach settings, sign-out and the upgrade
//! page; every other navigation is replaced by the billing surface. The
//! application runs two navigation stacks side by side, and both must reach
//! the same conclusion for the same destination.
//!
//! ## One Policy, Many Adapters
//!
//! - [`RouteAllowlist`] and [`GateDecisionEngine`] are defined once and are
//!   pure.
//! - [`SubscriptionStateStore`] is the single mutable cell for billing
//!   state; only the [`BillingSurfaceHost`] relay writes it.
//! - Each stack gets a [`NavigationInterceptor`] built from the same
//!   [`ForceUpgradeGate`]; its [`NavigationStack`] adapter only normalizes
//!   the stack's path syntax into a [`RouteIdentifier`].
//!
//! ## Example
//!
//! ```rust
//! use upgrade_gate_core::{
//!     ComponentShellStack, ForceUpgradeGate, GateConfig, LegacyShellStack, NavigationRequest,
//! };
//!
//! let gate = ForceUpgradeGate::builder()
//!     .config(GateConfig { force_upgrade: true, ..Default::default() })
//!     .build()
//!     .unwrap();
//!
//! gate.store().update(&serde_json::json!({
//!     "subscription": { "isActiveTrial": false, "status": "past_due" }
//! }));
//!
//! let legacy = gate.interceptor(LegacyShellStack::default());
//! let component = gate.interceptor(ComponentShellStack);
//!
//! assert!(legacy.intercept(&NavigationRequest::direct("/ghost/tags")).is_lockout());
//! assert!(component.intercept(&NavigationRequest::sidebar("#/tags")).is_lockout());
//! assert!(!component.intercept(&NavigationRequest::sidebar("#/settings")).is_lockout());
//! ```

#![deny(unsafe_code)]
#![cfg_attr(feature = "strict-docs", warn(missing_docs))]
#![cfg_attr(not(feature = "strict-docs"), allow(missing_docs))]

pub mod allowlist;
pub mod billing;
pub mod config;
pub mod engine;
pub mod error;
pub mod gate;
pub mod interceptor;
pub mod mocks;
pub mod shell;
pub mod stack;
pub mod store;

pub use allowlist::RouteAllowlist;
pub use billing::{
    BillingSurface, BillingSurfaceHost, HostContext, MessageOutcome, StaticTokenProvider,
    TokenProvider, UnavailableTokenProvider, BILLING_FRAME_TITLE,
};
pub use config::{origin_of, BillingConfig, GateConfig, LiveConfig};
pub use engine::GateDecisionEngine;
pub use error::{GateError, Result};
pub use gate::{ForceUpgradeGate, ForceUpgradeGateBuilder};
pub use interceptor::{Interception, NavigationInterceptor, NavigationRequest, NavigationTrigger};
pub use mocks::MockTokenProvider;
pub use shell::{NavigationOutcome, PendingTransition, RouteLoader, RouteView, Shell};
pub use stack::{ComponentShellStack, LegacyShellStack, NavigationStack};
pub use store::SubscriptionStateStore;

pub use upgrade_gate_types::{
    DecisionReason, GateDecision, GateOutcome, RouteIdentifier, SubscriptionState,
    SubscriptionStatus,
};
