//! # DRIV Vault
//!
//! Death-verification quorum and vault services for the Digital Rights
//! Inheritance Vault.
//!
//! ## Components
//!
//! - **Quorum**: unlock thresholds over verified death verifications
//! - **Verification**: submission, review, and the quorum verifier
//! - **Registry**: accounts and sessions, plus owner-scoped vaults, assets,
//!   instructions, parties, notifications and subscriptions
//! - **Store**: document store trait with an in-memory backend
//! - **Notify**: fire-and-forget notification dispatch
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                         DrivVault                           │
//! ├─────────────────────────────────────────────────────────────┤
//! │  ┌──────────────────┐  ┌──────────────┐  ┌───────────────┐ │
//! │  │ DeathVerification│──│   Quorum     │──│   Registry    │ │
//! │  │     Service      │  │  Verifier    │  │   services    │ │
//! │  └────────┬─────────┘  └──────┬───────┘  └───────┬───────┘ │
//! │           └───────────────────┼──────────────────┘         │
//! │                      ┌────────┴────────┐                   │
//! │                      │  DocumentStore  │                   │
//! │                      └─────────────────┘                   │
//! └─────────────────────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod notify;
pub mod quorum;
pub mod registry;
pub mod store;
pub mod verification;

pub use config::DrivConfig;
pub use notify::{LogDispatcher, Message, NotificationDispatcher};
pub use quorum::QuorumPolicy;
pub use registry::{
    AccountService, AnalyticsService, AssetService, DashboardSummary, InstructionService,
    NotificationService, Session, SubscriptionService, TrustedPartyService, VaultService,
};
pub use store::{Collection, DocumentStore, Filter, InMemoryStore, Records, Update};
pub use verification::{
    DeathVerificationService, QuorumOutcome, QuorumVerifier, SubmissionConfig, UnlockWrite,
    VerifierConfig,
};

use driv_common::{Actor, Result, StaticAuthenticator};
use std::sync::Arc;
use tracing::info;

/// DRIV service: every vault operation over one explicitly opened store
pub struct DrivVault {
    config: DrivConfig,
    store: Arc<dyn DocumentStore>,
    accounts: AccountService,
    vaults: VaultService,
    assets: AssetService,
    instructions: InstructionService,
    trusted_parties: TrustedPartyService,
    verifications: DeathVerificationService,
    notifications: NotificationService,
    subscriptions: SubscriptionService,
    analytics: AnalyticsService,
}

impl DrivVault {
    /// Wire all services to `store` and `dispatcher`
    pub fn open(
        config: DrivConfig,
        store: Arc<dyn DocumentStore>,
        dispatcher: Arc<dyn NotificationDispatcher>,
    ) -> Self {
        let records = Records::new(store.clone());
        let limit = config.storage.list_limit;

        let verifier = QuorumVerifier::new(config.verifier_config(), records.clone())
            .with_dispatcher(dispatcher.clone());
        let verifications = DeathVerificationService::new(
            config.submission_config(),
            records.clone(),
            Arc::new(verifier),
        );

        info!(
            policy = %config.quorum.policy,
            unlock_write = ?config.quorum.unlock_write,
            "DRIV vault opened"
        );

        Self {
            accounts: AccountService::new(
                records.clone(),
                dispatcher.clone(),
                StaticAuthenticator::new(),
            ),
            vaults: VaultService::new(records.clone(), limit),
            assets: AssetService::new(records.clone(), limit),
            instructions: InstructionService::new(records.clone(), limit),
            trusted_parties: TrustedPartyService::new(records.clone(), dispatcher, limit),
            verifications,
            notifications: NotificationService::new(records.clone()),
            subscriptions: SubscriptionService::new(records.clone(), limit),
            analytics: AnalyticsService::new(records),
            config,
            store,
        }
    }

    /// Vault over a fresh in-memory store with log-only notifications
    pub fn in_memory(config: DrivConfig) -> Self {
        Self::open(config, Arc::new(InMemoryStore::new()), Arc::new(LogDispatcher))
    }

    pub fn config(&self) -> &DrivConfig {
        &self.config
    }

    pub fn store(&self) -> &Arc<dyn DocumentStore> {
        &self.store
    }

    pub fn accounts(&self) -> &AccountService {
        &self.accounts
    }

    pub fn vaults(&self) -> &VaultService {
        &self.vaults
    }

    pub fn assets(&self) -> &AssetService {
        &self.assets
    }

    pub fn instructions(&self) -> &InstructionService {
        &self.instructions
    }

    pub fn trusted_parties(&self) -> &TrustedPartyService {
        &self.trusted_parties
    }

    pub fn verifications(&self) -> &DeathVerificationService {
        &self.verifications
    }

    pub fn notifications(&self) -> &NotificationService {
        &self.notifications
    }

    pub fn subscriptions(&self) -> &SubscriptionService {
        &self.subscriptions
    }

    pub fn analytics(&self) -> &AnalyticsService {
        &self.analytics
    }

    /// Resolve a bearer credential issued by [`AccountService`]
    pub async fn authenticate(&self, bearer: &str) -> Result<Actor> {
        self.accounts.authenticate(bearer).await
    }

    /// Close the underlying store
    pub async fn shutdown(&self) -> Result<()> {
        self.store.close().await?;
        info!("DRIV vault closed");
        Ok(())
    }
}
