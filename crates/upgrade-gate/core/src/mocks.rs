//! Mock collaborators for testing

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use crate::billing::TokenProvider;
use crate::error::{GateError, Result};

/// Token provider that returns a fixed token or always fails, counting calls.
#[derive(Debug, Default)]
pub struct MockTokenProvider {
    token: Option<String>,
    calls: AtomicUsize,
}

impl MockTokenProvider {
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: Some(token.into()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TokenProvider for MockTokenProvider {
    async fn token(&self) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.token
            .clone()
            .ok_or_else(|| GateError::TokenUnavailable("mock provider has no token".into()))
    }
}
