//! Quorum Verifier
//!
//! Decides whether a vault's accumulated death verifications unlock it:
//! 1. Counts verifications of the vault in the `verified` state
//! 2. Counts trusted parties of the vault with the verifier role
//! 3. Applies the configured [`QuorumPolicy`]
//! 4. Writes `is_locked = false` when the threshold is met
//!
//! [`QuorumVerifier::evaluate`] is idempotent and is the single entry point
//! used by submission, status updates, and explicit rechecks. Ownership is
//! checked by the caller.

use std::sync::Arc;

use dashmap::DashMap;
use driv_common::{
    Notification, NotificationCreate, NotificationKind, Result, RoleType, User, Vault,
    VerificationStatus,
};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};

use crate::notify::{send_best_effort, Message, NotificationDispatcher};
use crate::quorum::QuorumPolicy;
use crate::store::{Collection, Filter, Records, Update};

/// How the unlock is written once quorum is met
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnlockWrite {
    /// Set `is_locked = false` by id every time quorum is met, and log each time.
    /// Concurrent submissions may both write and both log.
    #[default]
    Unconditional,
    /// Serialize evaluation per vault and only flip `is_locked` from true to
    /// false; the unlock is logged and announced once.
    CompareAndSet,
}

impl std::str::FromStr for UnlockWrite {
    type Err = driv_common::VaultError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "unconditional" => Ok(UnlockWrite::Unconditional),
            "compare_and_set" => Ok(UnlockWrite::CompareAndSet),
            other => Err(driv_common::VaultError::Config(format!(
                "unknown unlock write mode: {other}"
            ))),
        }
    }
}

/// Configuration for the quorum verifier
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VerifierConfig {
    pub policy: QuorumPolicy,
    pub unlock_write: UnlockWrite,
    /// Store and send a notification to the vault owner on unlock
    pub notify_on_unlock: bool,
}

/// Result of one quorum evaluation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuorumOutcome {
    pub vault_id: String,
    /// Verifications in the `verified` state
    pub verified: usize,
    /// Trusted parties with the verifier role
    pub verifiers: usize,
    pub threshold: f64,
    pub met: bool,
    /// Whether this evaluation changed the stored lock flag
    pub unlocked: bool,
}

/// Evaluates and applies the death-verification quorum
pub struct QuorumVerifier {
    config: VerifierConfig,
    records: Records,
    dispatcher: Option<Arc<dyn NotificationDispatcher>>,
    /// Per-vault evaluation locks for [`UnlockWrite::CompareAndSet`], present
    /// only while an evaluation of that vault is running or waiting
    vault_locks: DashMap<String, Arc<Mutex<()>>>,
}

impl QuorumVerifier {
    pub fn new(config: VerifierConfig, records: Records) -> Self {
        Self {
            config,
            records,
            dispatcher: None,
            vault_locks: DashMap::new(),
        }
    }

    /// Set the dispatcher used for unlock notifications
    pub fn with_dispatcher(mut self, dispatcher: Arc<dyn NotificationDispatcher>) -> Self {
        self.dispatcher = Some(dispatcher);
        self
    }

    pub fn config(&self) -> &VerifierConfig {
        &self.config
    }

    /// Count the evidence for `vault_id` and unlock it if quorum is met
    #[instrument(skip(self))]
    pub async fn evaluate(&self, vault_id: &str) -> Result<QuorumOutcome> {
        match self.config.unlock_write {
            UnlockWrite::Unconditional => self.evaluate_unguarded(vault_id).await,
            UnlockWrite::CompareAndSet => {
                let lock = self
                    .vault_locks
                    .entry(vault_id.to_string())
                    .or_default()
                    .clone();
                let outcome = {
                    let _guard = lock.lock().await;
                    self.evaluate_unguarded(vault_id).await
                };
                drop(lock);
                // Only the map's own handle left: nobody holds or awaits this lock
                self.vault_locks
                    .remove_if(vault_id, |_, lock| Arc::strong_count(lock) == 1);
                outcome
            }
        }
    }

    async fn evaluate_unguarded(&self, vault_id: &str) -> Result<QuorumOutcome> {
        let verified = self
            .records
            .count(
                Collection::DeathVerifications,
                &Filter::new()
                    .with("vault_id", vault_id)
                    .with("status", VerificationStatus::Verified.as_str()),
            )
            .await?;

        let verifiers = self
            .records
            .count(
                Collection::TrustedParties,
                &Filter::new()
                    .with("vault_id", vault_id)
                    .with("role", RoleType::Verifier.as_str()),
            )
            .await?;

        let policy = self.config.policy;
        let threshold = policy.threshold(verifiers);
        let met = policy.is_met(verified, verifiers);

        let mut outcome = QuorumOutcome {
            vault_id: vault_id.to_string(),
            verified,
            verifiers,
            threshold,
            met,
            unlocked: false,
        };

        if !met {
            debug!(
                vault_id = %vault_id,
                verified,
                verifiers,
                threshold,
                "Verification threshold not met"
            );
            return Ok(outcome);
        }

        let unlock = Update::new().set("is_locked", false);
        let target = match self.config.unlock_write {
            UnlockWrite::Unconditional => Filter::new().with("id", vault_id),
            UnlockWrite::CompareAndSet => Filter::new().with("id", vault_id).with("is_locked", true),
        };
        let modified = self
            .records
            .update_one(Collection::Vaults, &target, &unlock)
            .await?;
        outcome.unlocked = modified > 0;

        let announce = match self.config.unlock_write {
            UnlockWrite::Unconditional => true,
            UnlockWrite::CompareAndSet => outcome.unlocked,
        };
        if announce {
            info!(
                vault_id = %vault_id,
                verified,
                verifiers,
                threshold,
                policy = %policy,
                "Vault unlocked after verification threshold met"
            );
            if self.config.notify_on_unlock {
                self.notify_owner(&outcome).await?;
            }
        }

        Ok(outcome)
    }

    /// Record an in-app notification for the owner and email them
    async fn notify_owner(&self, outcome: &QuorumOutcome) -> Result<()> {
        let vault: Option<Vault> = self
            .records
            .find_one(Collection::Vaults, &Filter::new().with("id", outcome.vault_id.as_str()))
            .await?;
        let Some(vault) = vault else {
            warn!(vault_id = %outcome.vault_id, "Unlocked vault has no record; skipping notification");
            return Ok(());
        };

        let notification = Notification::new(
            vault.user_id.as_str(),
            NotificationCreate {
                title: "Vault unlocked".to_string(),
                message: format!(
                    "Vault \"{}\" was unlocked after {} verified death verifications.",
                    vault.name, outcome.verified
                ),
                kind: NotificationKind::Alert,
            },
        );
        self.records
            .insert(Collection::Notifications, &notification)
            .await?;

        if let Some(dispatcher) = &self.dispatcher {
            let owner: Option<User> = self
                .records
                .find_one(Collection::Users, &Filter::new().with("id", vault.user_id.as_str()))
                .await?;
            if let Some(owner) = owner {
                send_best_effort(
                    dispatcher.as_ref(),
                    Message::new(owner.email, notification.title, notification.message),
                )
                .await;
            }
        }
        Ok(())
    }
}

impl std::fmt::Debug for QuorumVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QuorumVerifier")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
