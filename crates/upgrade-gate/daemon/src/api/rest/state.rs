//! Application state shared across handlers

use std::sync::Arc;

use upgrade_gate_core::{
    ComponentShellStack, ForceUpgradeGate, LegacyShellStack, NavigationInterceptor, RouteLoader,
};
use upgrade_gate_types::RouteIdentifier;

use super::handlers::AdminPages;
use crate::config::AuthConfig;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Store, live config and billing host
    pub gate: ForceUpgradeGate,

    /// Interceptor for the server-routed shell
    pub legacy: NavigationInterceptor<LegacyShellStack>,

    /// Interceptor for the component-routed shell
    pub component: NavigationInterceptor<ComponentShellStack>,

    /// Renders admin pages once the gate allowed them
    pub pages: Arc<dyn RouteLoader>,

    /// Relay and operator secrets
    pub auth: Arc<AuthConfig>,

    /// Daemon version
    pub version: String,

    /// Start time
    pub started_at: chrono::DateTime<chrono::Utc>,
}

impl AppState {
    /// Create new application state; the legacy shell is mounted at `mount`.
    pub fn new(gate: ForceUpgradeGate, mount: &str) -> Self {
        Self {
            legacy: gate.interceptor(LegacyShellStack::new(mount)),
            component: gate.interceptor(ComponentShellStack),
            pages: Arc::new(AdminPages),
            auth: Arc::new(AuthConfig::default()),
            gate,
            version: env!("CARGO_PKG_VERSION").to_string(),
            started_at: chrono::Utc::now(),
        }
    }

    /// Use these secrets for the relay and operator endpoints
    pub fn with_auth(mut self, auth: AuthConfig) -> Self {
        self.auth = Arc::new(auth);
        self
    }

    /// Path of the upgrade page blocked requests are sent to
    pub fn pro_path(&self) -> String {
        format!("{}/pro/", self.legacy.stack().mount().trim_end_matches('/'))
    }

    /// Upgrade page for a request blocked on `route`
    pub fn pro_path_from(&self, route: RouteIdentifier) -> String {
        format!("{}?from={}", self.pro_path(), route)
    }

    /// Get uptime as a human-readable string
    pub fn uptime(&self) -> String {
        let duration = chrono::Utc::now() - self.started_at;
        let secs = duration.num_seconds();

        if secs < 60 {
            format!("{}s", secs)
        } else if secs < 3600 {
            format!("{}m {}s", secs / 60, secs % 60)
        } else if secs < 86400 {
            format!("{}h {}m", secs / 3600, (secs % 3600) / 60)
        } else {
            format!("{}d {}h", secs / 86400, (secs % 86400) / 3600)
        }
    }
}
