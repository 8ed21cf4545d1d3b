//! Configuration for upgrade-gate-daemon

use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use upgrade_gate_core::{GateConfig, HostContext};
use upgrade_gate_types::OwnerUser;

/// Main daemon configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DaemonConfig {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Forced-upgrade gate settings
    #[serde(default)]
    pub gate: GateConfig,

    /// Signed-in user context handed to the billing surface
    #[serde(default)]
    pub host: HostConfig,

    /// Credentials for the relay and operator endpoints
    #[serde(default)]
    pub auth: AuthConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Listen address
    #[serde(default = "default_listen_addr")]
    pub listen_addr: SocketAddr,

    /// Path the server-routed admin shell is mounted at
    #[serde(default = "default_admin_mount")]
    pub admin_mount: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
            admin_mount: default_admin_mount(),
        }
    }
}

/// Host context
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HostConfig {
    /// Whether the signed-in user owns the site
    #[serde(default)]
    pub is_owner: bool,

    /// Owner name, shown to staff who cannot pay themselves
    #[serde(default)]
    pub owner_name: Option<String>,

    /// Owner email
    #[serde(default)]
    pub owner_email: Option<String>,

    /// Identity token handed to the billing surface on request
    #[serde(default, skip_serializing)]
    pub identity_token: Option<String>,
}

impl HostConfig {
    /// Context exposed through the `forceUpgradeInfo` reply.
    pub fn context(&self) -> HostContext {
        let owner_user = match (&self.owner_name, &self.owner_email) {
            (None, None) => None,
            (name, email) => Some(OwnerUser {
                name: name.clone().unwrap_or_default(),
                email: email.clone().unwrap_or_default(),
            }),
        };
        HostContext {
            is_owner: self.is_owner,
            owner_user,
        }
    }
}

/// Shared secrets guarding the API.
///
/// An unset secret disables the endpoints it guards.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Secret the billing relay sends in `x-gate-relay-secret`
    #[serde(default, skip_serializing)]
    pub relay_secret: Option<String>,

    /// Bearer token required on `/config` endpoints
    #[serde(default, skip_serializing)]
    pub operator_token: Option<String>,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub level: String,

    /// JSON format
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

// Default value helpers
fn default_listen_addr() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 2369))
}

fn default_admin_mount() -> String {
    "/ghost".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl DaemonConfig {
    /// Load configuration: defaults, then the optional file, then `GATE_*`
    /// environment variables (`GATE_GATE__FORCE_UPGRADE=true`).
    pub fn load(path: Option<&str>) -> Result<Self, config::ConfigError> {
        let mut builder = config::Config::builder();

        // Add default configuration
        builder = builder.add_source(config::Config::try_from(&DaemonConfig::default())?);

        // Add file configuration if provided
        if let Some(path) = path {
            builder = builder.add_source(config::File::with_name(path).required(false));
        }

        // Add environment variables with GATE_ prefix
        builder = builder.add_source(
            config::Environment::with_prefix("GATE")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        builder.build()?.try_deserialize()
    }
}
