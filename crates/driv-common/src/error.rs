//! Error types for the DRIV vault
//!
//! Provides a unified error type plus the storage error raised by document
//! store backends.

use thiserror::Error;

use crate::types::death_verification::VerificationStatus;

/// Result type alias using VaultError
pub type Result<T> = std::result::Result<T, VaultError>;

/// Unified error type for vault operations
#[derive(Debug, Error)]
pub enum VaultError {
    /// Record does not exist or is not owned by the acting user
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid status transition: {from} -> {to}")]
    InvalidTransition {
        from: VerificationStatus,
        to: VerificationStatus,
    },

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Invalid authentication credentials")]
    Unauthorized,

    #[error("Storage error: {0}")]
    Storage(#[from] StoreError),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl VaultError {
    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        VaultError::NotFound {
            entity,
            id: id.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, VaultError::NotFound { .. })
    }

    /// Malformed input or a forbidden state change
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            VaultError::Validation(_) | VaultError::InvalidTransition { .. }
        )
    }
}

/// Errors from document store operations
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    #[error("Document is not a JSON object")]
    NotAnObject,

    #[error("Store is closed")]
    Closed,

    #[error("Backend error: {0}")]
    Backend(String),
}

impl From<serde_json::Error> for VaultError {
    fn from(err: serde_json::Error) -> Self {
        VaultError::Serialization(err.to_string())
    }
}

impl From<anyhow::Error> for VaultError {
    fn from(err: anyhow::Error) -> Self {
        VaultError::Config(err.to_string())
    }
}
