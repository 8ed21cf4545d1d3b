//! Gate configuration
//!
//! The gate consumes two operator settings: whether forced-upgrade mode is
//! on, and where the billing surface lives. Both are read through
//! [`LiveConfig`] at evaluation time, so changes apply to the next
//! navigation without a restart.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::info;

use crate::error::{GateError, Result};

/// Operator settings consumed by the gate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GateConfig {
    /// Forced-upgrade mode
    #[serde(default)]
    pub force_upgrade: bool,

    /// Billing surface settings
    #[serde(default)]
    pub billing: BillingConfig,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            force_upgrade: false,
            billing: BillingConfig::default(),
        }
    }
}

impl GateConfig {
    pub fn validate(&self) -> Result<()> {
        self.billing.validate()
    }
}

/// Billing surface settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillingConfig {
    #[serde(default)]
    pub enabled: bool,

    /// Base URL of the remote billing surface
    #[serde(default = "default_billing_url")]
    pub url: String,
}

impl Default for BillingConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            url: default_billing_url(),
        }
    }
}

impl BillingConfig {
    pub fn validate(&self) -> Result<()> {
        validate_billing_url(&self.url)
    }
}

fn default_billing_url() -> String {
    "http://127.0.0.1:4000".to_string()
}

fn validate_billing_url(url: &str) -> Result<()> {
    let rest = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
        .ok_or_else(|| {
            GateError::InvalidConfig(format!("billing url must be http(s): {}", url))
        })?;
    if rest.is_empty() || rest.starts_with('/') {
        return Err(GateError::InvalidConfig(format!(
            "billing url has no host: {}",
            url
        )));
    }
    Ok(())
}

/// `scheme://host[:port]` of a billing URL, the form browsers send in the
/// `Origin` header. `None` when the URL is not http(s).
pub fn origin_of(url: &str) -> Option<String> {
    let (scheme, rest) = url.split_once("://")?;
    let scheme = scheme.to_ascii_lowercase();
    if scheme != "http" && scheme != "https" {
        return None;
    }
    let authority = rest.split(['/', '?', '#']).next().unwrap_or_default();
    if authority.is_empty() {
        return None;
    }
    Some(format!("{}://{}", scheme, authority.to_ascii_lowercase()))
}

/// Shared, live view of the [`GateConfig`].
///
/// Clones refer to the same configuration.
#[derive(Clone)]
pub struct LiveConfig {
    tx: Arc<watch::Sender<GateConfig>>,
}

impl LiveConfig {
    pub fn new(config: GateConfig) -> Result<Self> {
        config.validate()?;
        let (tx, _rx) = watch::channel(config);
        Ok(Self { tx: Arc::new(tx) })
    }

    /// Copy of the configuration as of now.
    pub fn snapshot(&self) -> GateConfig {
        self.tx.borrow().clone()
    }

    pub fn force_upgrade(&self) -> bool {
        self.tx.borrow().force_upgrade
    }

    pub fn billing_url(&self) -> String {
        self.tx.borrow().billing.url.clone()
    }

    /// Origin the billing surface posts from.
    pub fn billing_origin(&self) -> Option<String> {
        origin_of(&self.tx.borrow().billing.url)
    }

    pub fn set_force_upgrade(&self, enabled: bool) {
        info!(enabled, "Forced-upgrade mode changed");
        self.tx.send_modify(|config| config.force_upgrade = enabled);
    }

    pub fn set_billing_url(&self, url: impl Into<String>) -> Result<()> {
        let url = url.into();
        validate_billing_url(&url)?;
        info!(url = %url, "Billing surface URL changed");
        self.tx.send_modify(|config| config.billing.url = url);
        Ok(())
    }

    /// Replace the whole configuration.
    pub fn replace(&self, config: GateConfig) -> Result<()> {
        config.validate()?;
        self.tx.send_replace(config);
        Ok(())
    }

    pub fn subscribe(&self) -> watch::Receiver<GateConfig> {
        self.tx.subscribe()
    }
}

impl fmt::Debug for LiveConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("LiveConfig").field(&*self.tx.borrow()).finish()
    }
}
