//! Acting principal and the authenticator seam
//!
//! The surrounding session layer resolves a bearer credential to an [`Actor`].
//! Ownership checks in the vault services trust that identity as given.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{Result, VaultError};

/// Authenticated user performing an operation
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Actor {
    pub user_id: String,
}

impl Actor {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
        }
    }
}

/// Resolves bearer credentials to actors
#[async_trait]
pub trait Authenticator: Send + Sync {
    async fn authenticate(&self, bearer: &str) -> Result<Actor>;
}

/// Authenticator backed by an in-process token table
///
/// Used for embedding and tests; issued tokens never expire.
#[derive(Debug, Clone, Default)]
pub struct StaticAuthenticator {
    tokens: Arc<RwLock<HashMap<String, String>>>,
}

impl StaticAuthenticator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a fresh opaque token for `user_id`
    pub fn issue(&self, user_id: &str) -> String {
        let token = uuid::Uuid::new_v4().simple().to_string();
        self.tokens
            .write()
            .insert(token.clone(), user_id.to_string());
        debug!(user_id = %user_id, "Issued session token");
        token
    }

    pub fn revoke(&self, token: &str) -> bool {
        self.tokens.write().remove(token).is_some()
    }
}

#[async_trait]
impl Authenticator for StaticAuthenticator {
    async fn authenticate(&self, bearer: &str) -> Result<Actor> {
        let token = bearer.strip_prefix("Bearer ").unwrap_or(bearer).trim();
        match self.tokens.read().get(token) {
            Some(user_id) => Ok(Actor::new(user_id.clone())),
            None => {
                warn!("Rejected unknown session token");
                Err(VaultError::Unauthorized)
            }
        }
    }
}
