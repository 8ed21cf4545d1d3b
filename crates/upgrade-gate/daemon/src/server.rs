//! Server setup and lifecycle management

use crate::api::create_router;
use crate::api::rest::state::AppState;
use crate::config::DaemonConfig;
use crate::error::{DaemonError, DaemonResult};
use std::sync::Arc;
use tokio::net::TcpListener;
use upgrade_gate_core::{
    ForceUpgradeGate, StaticTokenProvider, SubscriptionStateStore, TokenProvider,
    UnavailableTokenProvider,
};

/// Upgrade Gate Server
pub struct Server {
    config: DaemonConfig,
    state: AppState,
}

impl Server {
    /// Create a new server with the given configuration
    pub fn new(config: DaemonConfig) -> DaemonResult<Self> {
        if config.server.admin_mount.trim_matches('/').is_empty() {
            return Err(DaemonError::Config(
                "admin_mount must name a path below the root".into(),
            ));
        }

        let tokens: Arc<dyn TokenProvider> = match &config.host.identity_token {
            Some(token) => Arc::new(StaticTokenProvider::new(token.clone())),
            None => Arc::new(UnavailableTokenProvider),
        };

        let gate = ForceUpgradeGate::builder()
            .config(config.gate.clone())
            .token_provider(tokens)
            .host_context(config.host.context())
            .build()?;

        let state =
            AppState::new(gate, &config.server.admin_mount).with_auth(config.auth.clone());

        Ok(Self { config, state })
    }

    /// Shared application state
    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Run the server
    pub async fn run(self) -> DaemonResult<()> {
        let addr = self.config.server.listen_addr;

        // Create router
        let app = create_router(self.state.clone());

        // Create listener
        let listener = TcpListener::bind(addr).await?;

        tracing::info!("Upgrade gate listening on {}", addr);
        tracing::info!(
            force_upgrade = self.state.gate.config().force_upgrade(),
            mount = self.state.legacy.stack().mount(),
            "Gate configured"
        );

        // Log subscription changes in background
        tokio::spawn(watch_subscription(self.state.gate.store().clone()));

        // Run server with graceful shutdown
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| DaemonError::Server(e.to_string()))?;

        tracing::info!("Upgrade gate shutting down");

        Ok(())
    }
}

/// Follow the store until it is dropped
async fn watch_subscription(store: SubscriptionStateStore) {
    let mut rx = store.subscribe();
    drop(store);
    while rx.changed().await.is_ok() {
        let state = rx.borrow_and_update().clone();
        match state.subscription() {
            Some(subscription) => tracing::info!(
                status = %subscription.status,
                is_active_trial = subscription.is_active_trial,
                good_standing = subscription.is_in_good_standing(),
                "Subscription state changed"
            ),
            None => tracing::info!("Subscription state cleared"),
        }
    }
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install signal handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received terminate signal, initiating graceful shutdown");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use upgrade_gate_types::OwnerUser;

    #[test]
    fn test_rejects_root_mount() {
        let mut config = DaemonConfig::default();
        config.server.admin_mount = "/".into();
        assert!(matches!(Server::new(config), Err(DaemonError::Config(_))));
    }

    #[test]
    fn test_rejects_invalid_billing_url() {
        let mut config = DaemonConfig::default();
        config.gate.billing.url = "not a url".into();
        assert!(matches!(Server::new(config), Err(DaemonError::Gate(_))));
    }

    #[test]
    fn test_auth_reaches_state() {
        let mut config = DaemonConfig::default();
        config.auth.relay_secret = Some("relay".into());
        let server = Server::new(config).unwrap();
        assert_eq!(server.state().auth.relay_secret.as_deref(), Some("relay"));
        assert!(server.state().auth.operator_token.is_none());
    }

    #[tokio::test]
    async fn test_host_context_reaches_billing_surface() {
        let mut config = DaemonConfig::default();
        config.host.is_owner = true;
        config.host.owner_email = Some("owner@example.com".into());
        config.host.identity_token = Some("identity".into());

        let server = Server::new(config).unwrap();
        let billing = server.state().gate.billing();
        assert!(billing.context().is_owner);
        assert_eq!(
            billing.context().owner_user,
            Some(OwnerUser {
                name: String::new(),
                email: "owner@example.com".into(),
            })
        );

        let outcome = billing
            .handle_message(&serde_json::json!({ "request": "token" }))
            .await;
        assert_eq!(
            outcome,
            upgrade_gate_core::MessageOutcome::Reply(upgrade_gate_types::OutboundReply::token(
                Some("identity".into())
            ))
        );
    }
}
