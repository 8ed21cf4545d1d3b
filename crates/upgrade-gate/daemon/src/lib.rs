//! Upgrade Gate daemon library
//!
//! This module provides the components of the `gated` service:
//! - REST API for the billing relay, gate decisions and live configuration
//! - The server-routed admin shell, gated by the legacy interceptor
//! - Configuration loading and server lifecycle management

pub mod api;
pub mod config;
pub mod error;
pub mod server;

pub use api::create_router;
pub use api::rest::state::AppState;
pub use config::DaemonConfig;
pub use error::{ApiError, ApiResult, DaemonError, DaemonResult};
pub use server::Server;
