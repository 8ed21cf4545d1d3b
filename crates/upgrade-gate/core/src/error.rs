//! Error types for the upgrade gate

use thiserror::Error;

/// Errors surfaced by the gate's collaborators.
///
/// Gate decisions themselves never fail: missing or unrecognized input is
/// mapped to a blocking decision instead of an error.
#[derive(Error, Debug)]
pub enum GateError {
    #[error("token unavailable: {0}")]
    TokenUnavailable(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias for gate operations
pub type Result<T> = std::result::Result<T, GateError>;
