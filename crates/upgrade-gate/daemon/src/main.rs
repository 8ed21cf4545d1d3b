//! Upgrade Gate Daemon - forced-upgrade access gate service
//!
//! The daemon provides:
//! - REST API for the billing relay, gate decisions and live configuration
//! - The server-routed admin shell behind the legacy navigation interceptor

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use upgrade_gate_daemon::{DaemonConfig, DaemonError, DaemonResult, Server};

/// Upgrade Gate Daemon CLI
#[derive(Parser)]
#[command(name = "gated")]
#[command(about = "Upgrade Gate Daemon - forced-upgrade access gate", long_about = None)]
#[command(version)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, env = "GATE_CONFIG")]
    config: Option<String>,

    /// Listen address
    #[arg(short, long, env = "GATE_LISTEN_ADDR")]
    listen: Option<String>,

    /// Log level
    #[arg(long, env = "GATE_LOG_LEVEL")]
    log_level: Option<String>,

    /// Enable JSON logging
    #[arg(long, env = "GATE_LOG_JSON")]
    json: bool,

    /// Force forced-upgrade mode on or off
    #[arg(long, env = "GATE_FORCE_UPGRADE")]
    force_upgrade: Option<bool>,
}

#[tokio::main]
async fn main() -> DaemonResult<()> {
    let cli = Cli::parse();

    // Load configuration
    let mut config = DaemonConfig::load(cli.config.as_deref())
        .map_err(|e| DaemonError::Config(e.to_string()))?;

    // Override with CLI args
    if let Some(listen) = &cli.listen {
        config.server.listen_addr = listen
            .parse()
            .map_err(|e| DaemonError::Config(format!("Invalid listen address: {}", e)))?;
    }
    if let Some(level) = cli.log_level {
        config.logging.level = level;
    }
    if let Some(enabled) = cli.force_upgrade {
        config.gate.force_upgrade = enabled;
    }
    let json = cli.json || config.logging.json;

    // Initialize tracing
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| config.logging.level.clone().into());

    if json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    println!(
        r#"
  Upgrade Gate
  Version: {}
  Forced upgrade: {}
  Admin shell: {}
  Listening: {}
"#,
        env!("CARGO_PKG_VERSION"),
        if config.gate.force_upgrade { "on" } else { "off" },
        config.server.admin_mount,
        config.server.listen_addr
    );

    // Create and run server
    let server = Server::new(config)?;
    server.run().await
}
