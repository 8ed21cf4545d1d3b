//! Subscription state store
//!
//! Single mutable cell for the account's billing state. The billing relay is
//! the only writer; interceptors read it at decision time and views may
//! subscribe to be told when it changes.

use std::fmt;
use std::sync::Arc;

use chrono::Utc;
use serde_json::Value;
use tokio::sync::watch;
use tracing::{debug, info};
use upgrade_gate_types::{InboundMessage, Subscription, SubscriptionPayload, SubscriptionState};

/// Shared handle to the current [`SubscriptionState`].
///
/// Clones refer to the same cell.
#[derive(Clone)]
pub struct SubscriptionStateStore {
    tx: Arc<watch::Sender<SubscriptionState>>,
}

impl SubscriptionStateStore {
    /// Create a store in the `Unknown` state.
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(SubscriptionState::Unknown);
        Self { tx: Arc::new(tx) }
    }

    /// Accept an inbound billing message.
    ///
    /// Returns `true` when the message carried a subscription payload and the
    /// state was replaced. Anything else is ignored.
    pub fn update(&self, message: &Value) -> bool {
        match InboundMessage::parse(message) {
            Some(InboundMessage::Subscription(payload)) => {
                self.apply(payload);
                true
            }
            _ => {
                debug!("Ignoring billing message without a subscription payload");
                false
            }
        }
    }

    /// Replace the state with an already parsed payload.
    pub fn apply(&self, payload: SubscriptionPayload) -> SubscriptionState {
        let subscription = Subscription::from_payload(payload, Utc::now());
        info!(
            status = %subscription.status,
            is_active_trial = subscription.is_active_trial,
            "Subscription state updated"
        );
        let state = SubscriptionState::Known(subscription);
        self.tx.send_replace(state.clone());
        state
    }

    /// Latest state, `Unknown` until the first subscription message.
    pub fn current(&self) -> SubscriptionState {
        self.tx.borrow().clone()
    }

    /// Receiver notified on every successful update or reset.
    pub fn subscribe(&self) -> watch::Receiver<SubscriptionState> {
        self.tx.subscribe()
    }

    /// Forget the state at session end.
    pub fn reset(&self) {
        debug!("Subscription state reset");
        self.tx.send_replace(SubscriptionState::Unknown);
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for SubscriptionStateStore {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for SubscriptionStateStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubscriptionStateStore")
            .field("current", &*self.tx.borrow())
            .field("subscribers", &self.tx.receiver_count())
            .finish()
    }
}
