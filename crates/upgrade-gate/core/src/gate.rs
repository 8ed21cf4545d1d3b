//! The shared gate
//!
//! [`ForceUpgradeGate`] bundles the pieces every interceptor must share:
//! the subscription store, the live configuration and the billing host.
//! Interceptors for different stacks are created from the same gate, which
//! is what keeps their decisions identical.

use std::sync::Arc;

use upgrade_gate_types::{GateDecision, RouteIdentifier};

use crate::billing::{BillingSurfaceHost, HostContext, TokenProvider, UnavailableTokenProvider};
use crate::config::{GateConfig, LiveConfig};
use crate::engine::GateDecisionEngine;
use crate::error::Result;
use crate::interceptor::NavigationInterceptor;
use crate::stack::NavigationStack;
use crate::store::SubscriptionStateStore;

/// Shared gate state. Cheap to clone; clones share everything.
#[derive(Debug, Clone)]
pub struct ForceUpgradeGate {
    store: SubscriptionStateStore,
    config: LiveConfig,
    billing: Arc<BillingSurfaceHost>,
}

impl ForceUpgradeGate {
    pub fn builder() -> ForceUpgradeGateBuilder {
        ForceUpgradeGateBuilder::default()
    }

    pub fn store(&self) -> &SubscriptionStateStore {
        &self.store
    }

    pub fn config(&self) -> &LiveConfig {
        &self.config
    }

    pub fn billing(&self) -> &Arc<BillingSurfaceHost> {
        &self.billing
    }

    /// Create the interceptor for one navigation stack.
    pub fn interceptor<S: NavigationStack>(&self, stack: S) -> NavigationInterceptor<S> {
        NavigationInterceptor::new(stack, self.clone())
    }

    /// Decide for an already normalized route with the current state.
    pub fn decide(&self, route: RouteIdentifier) -> GateDecision {
        GateDecisionEngine::decide(&self.store.current(), route, self.config.force_upgrade())
    }
}

/// Builder for [`ForceUpgradeGate`]
#[derive(Default)]
pub struct ForceUpgradeGateBuilder {
    config: GateConfig,
    tokens: Option<Arc<dyn TokenProvider>>,
    context: HostContext,
    store: Option<SubscriptionStateStore>,
}

impl ForceUpgradeGateBuilder {
    pub fn config(mut self, config: GateConfig) -> Self {
        self.config = config;
        self
    }

    pub fn token_provider(mut self, tokens: Arc<dyn TokenProvider>) -> Self {
        self.tokens = Some(tokens);
        self
    }

    pub fn host_context(mut self, context: HostContext) -> Self {
        self.context = context;
        self
    }

    /// Use an existing store instead of a fresh `Unknown` one.
    pub fn store(mut self, store: SubscriptionStateStore) -> Self {
        self.store = Some(store);
        self
    }

    pub fn build(self) -> Result<ForceUpgradeGate> {
        let config = LiveConfig::new(self.config)?;
        let store = self.store.unwrap_or_default();
        let tokens = self
            .tokens
            .unwrap_or_else(|| Arc::new(UnavailableTokenProvider));
        let billing = Arc::new(BillingSurfaceHost::new(
            store.clone(),
            config.clone(),
            tokens,
            self.context,
        ));
        Ok(ForceUpgradeGate {
            store,
            config,
            billing,
        })
    }
}
