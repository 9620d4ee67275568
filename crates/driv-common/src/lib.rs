//! # DRIV Common
//!
//! Shared record types, errors, and identity primitives for the Digital Rights
//! Inheritance Vault.
//!
//! ## Core Types
//!
//! - [`Vault`]: container for digital assets with a lock flag
//! - [`TrustedParty`]: heir, verifier, or executor designated by the vault owner
//! - [`DeathVerification`]: evidence submission subject to independent review
//! - [`Asset`], [`LegacyInstruction`], [`Notification`], [`Subscription`], [`User`]: owner-scoped records
//!
//! ## Security
//!
//! - [`security::principal`]: acting user identity and the authenticator seam

pub mod error;
pub mod security;
pub mod types;

// Re-export commonly used types at crate root
pub use error::{Result, StoreError, VaultError};
pub use security::principal::{Actor, Authenticator, StaticAuthenticator};
pub use types::{
    asset::{Asset, AssetCategory, AssetCreate},
    death_verification::{DeathVerification, DeathVerificationCreate, VerificationStatus},
    legacy_instruction::{ActionType, LegacyInstruction, LegacyInstructionCreate},
    notification::{Notification, NotificationCreate, NotificationKind},
    subscription::{BillingCycle, Subscription, SubscriptionCreate},
    trusted_party::{RoleType, TrustedParty, TrustedPartyCreate},
    user::User,
    vault::{Vault, VaultCreate},
};

/// DRIV version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Name given to the vault created alongside every new account
pub const DEFAULT_VAULT_NAME: &str = "My Primary Vault";

/// Description given to the vault created alongside every new account
pub const DEFAULT_VAULT_DESCRIPTION: &str = "Default vault for digital assets";

/// Absolute floor on the number of verified attestations needed to unlock a vault
pub const MIN_QUORUM: usize = 2;

/// Fraction of registered verifiers used by the reference threshold
pub const REFERENCE_QUORUM_RATIO: f64 = 0.66;

/// Default page size for owner-scoped listings
pub const DEFAULT_LIST_LIMIT: usize = 1000;

/// Notifications are listed newest first and capped at this many
pub const NOTIFICATION_LIST_LIMIT: usize = 100;

/// Generate a fresh opaque record id
pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
