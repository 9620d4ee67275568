//! Vault - owner's container for digital assets
//!
//! A vault is created unlocked. The only lock transition this system performs
//! is the unlock written by the quorum verifier once enough death
//! verifications are verified; setting `is_locked = true` happens elsewhere.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vault {
    pub id: String,
    /// Owner
    pub user_id: String,
    pub name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub is_locked: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Owner-supplied fields for a new vault
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VaultCreate {
    pub name: String,
    pub description: Option<String>,
}

impl Vault {
    pub fn new(user_id: impl Into<String>, create: VaultCreate) -> Self {
        let now = Utc::now();
        Self {
            id: crate::new_id(),
            user_id: user_id.into(),
            name: create.name,
            description: create.description,
            is_locked: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// Default vault provisioned with every account
    pub fn primary(user_id: impl Into<String>) -> Self {
        Self::new(
            user_id,
            VaultCreate {
                name: crate::DEFAULT_VAULT_NAME.to_string(),
                description: Some(crate::DEFAULT_VAULT_DESCRIPTION.to_string()),
            },
        )
    }
}
