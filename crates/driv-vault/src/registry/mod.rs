//! Owner-scoped record services
//!
//! Thin layers over [`crate::store::Records`]. Every lookup is filtered by the
//! acting user, so a record owned by someone else reads as not found.

pub mod accounts;
pub mod analytics;
pub mod assets;
pub mod instructions;
pub mod notifications;
pub mod subscriptions;
pub mod trusted_parties;
pub mod vaults;

pub use accounts::{AccountService, Session};
pub use analytics::{AnalyticsService, DashboardSummary};
pub use assets::AssetService;
pub use instructions::InstructionService;
pub use notifications::NotificationService;
pub use subscriptions::SubscriptionService;
pub use trusted_parties::TrustedPartyService;
pub use vaults::VaultService;
