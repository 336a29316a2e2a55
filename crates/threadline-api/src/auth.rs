//! # Auth Token Store
//!
//! Holds the session's bearer token in memory. Login screens set it, the
//! transport reads it on every request. Nothing is persisted except what
//! the user chooses to put in the config file.

use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info};

/// Shared, cloneable handle to the current bearer token.
#[derive(Debug, Clone, Default)]
pub struct AuthToken {
    token: Arc<RwLock<Option<String>>>,
}

impl AuthToken {
    /// Creates a store, optionally seeded from config.
    pub fn new(token: Option<String>) -> Self {
        let token = token.filter(|t| !t.trim().is_empty());
        AuthToken {
            token: Arc::new(RwLock::new(token)),
        }
    }

    /// Replaces the token after a successful login.
    pub async fn set(&self, token: impl Into<String>) {
        let mut guard = self.token.write().await;
        *guard = Some(token.into());
        info!("Session token updated");
    }

    /// Drops the token on logout or after a 401.
    pub async fn clear(&self) {
        let mut guard = self.token.write().await;
        if guard.take().is_some() {
            debug!("Session token cleared");
        }
    }

    /// The token to send as `Authorization: Bearer <token>`, if any.
    pub async fn bearer(&self) -> Option<String> {
        self.token.read().await.clone()
    }

    pub async fn is_authenticated(&self) -> bool {
        self.token.read().await.is_some()
    }
}
