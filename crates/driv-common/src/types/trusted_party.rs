//! TrustedParty - person designated by the vault owner
//!
//! Only parties with [`RoleType::Verifier`] count toward the death-verification
//! quorum. `has_signed` tracks an unrelated acknowledgement and is never read
//! by the quorum verifier.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::VaultError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoleType {
    Heir,
    Verifier,
    Executor,
}

impl RoleType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RoleType::Heir => "heir",
            RoleType::Verifier => "verifier",
            RoleType::Executor => "executor",
        }
    }
}

impl std::fmt::Display for RoleType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for RoleType {
    type Err = VaultError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "heir" => Ok(RoleType::Heir),
            "verifier" => Ok(RoleType::Verifier),
            "executor" => Ok(RoleType::Executor),
            other => Err(VaultError::Validation(format!("unknown role: {other}"))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrustedParty {
    pub id: String,
    pub vault_id: String,
    /// Vault owner who designated this party
    pub user_id: String,
    pub name: String,
    pub email: String,
    pub role: RoleType,
    pub phone: Option<String>,
    pub relationship: Option<String>,
    #[serde(default)]
    pub has_signed: bool,
    pub signed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrustedPartyCreate {
    pub vault_id: String,
    pub name: String,
    pub email: String,
    pub role: RoleType,
    pub phone: Option<String>,
    pub relationship: Option<String>,
}

impl TrustedParty {
    pub fn new(user_id: impl Into<String>, create: TrustedPartyCreate) -> Self {
        Self {
            id: crate::new_id(),
            vault_id: create.vault_id,
            user_id: user_id.into(),
            name: create.name,
            email: create.email,
            role: create.role,
            phone: create.phone,
            relationship: create.relationship,
            has_signed: false,
            signed_at: None,
            created_at: Utc::now(),
        }
    }

    #[inline]
    pub fn is_verifier(&self) -> bool {
        self.role == RoleType::Verifier
    }
}
