//! Asset - reference to a digital asset held in a vault

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetCategory {
    Financial,
    Social,
    Personal,
    Crypto,
    Documents,
    Other,
}

impl AssetCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssetCategory::Financial => "financial",
            AssetCategory::Social => "social",
            AssetCategory::Personal => "personal",
            AssetCategory::Crypto => "crypto",
            AssetCategory::Documents => "documents",
            AssetCategory::Other => "other",
        }
    }
}

impl std::fmt::Display for AssetCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Asset {
    pub id: String,
    pub vault_id: String,
    pub user_id: String,
    pub name: String,
    pub category: AssetCategory,
    pub description: Option<String>,
    /// Opaque credential blob, encrypted by the caller
    pub credentials: Option<String>,
    pub url: Option<String>,
    pub value: Option<String>,
    pub metadata: Option<serde_json::Map<String, serde_json::Value>>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetCreate {
    pub vault_id: String,
    pub name: String,
    pub category: AssetCategory,
    pub description: Option<String>,
    pub credentials: Option<String>,
    pub url: Option<String>,
    pub value: Option<String>,
    pub metadata: Option<serde_json::Map<String, serde_json::Value>>,
}

impl Asset {
    pub fn new(user_id: impl Into<String>, create: AssetCreate) -> Self {
        Self {
            id: crate::new_id(),
            vault_id: create.vault_id,
            user_id: user_id.into(),
            name: create.name,
            category: create.category,
            description: create.description,
            credentials: create.credentials,
            url: create.url,
            value: create.value,
            metadata: create.metadata,
            created_at: Utc::now(),
        }
    }
}
