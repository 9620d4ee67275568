//! Death verification submissions and review
//!
//! Submission persists a pending record and then runs the quorum verifier for
//! the vault. Status updates move a record out of `pending`; whether they also
//! re-run the quorum verifier is configurable.

use std::sync::Arc;

use chrono::Utc;
use driv_common::{
    Actor, DeathVerification, DeathVerificationCreate, Result, TrustedParty, VaultError,
    VerificationStatus,
};
use serde::{Deserialize, Serialize};
use tracing::{error, info, instrument, warn};

use super::verifier::{QuorumOutcome, QuorumVerifier};
use crate::registry::vaults::require_owned_vault;
use crate::store::{Collection, Filter, Records, Update};

/// Submission and review settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionConfig {
    /// Re-run the quorum verifier after a status update
    pub retrigger_on_status_update: bool,
    /// Require `submitted_by` to be a trusted party of the vault
    pub validate_submitter: bool,
    /// Upper bound on listed records
    pub list_limit: usize,
}

impl Default for SubmissionConfig {
    fn default() -> Self {
        Self {
            retrigger_on_status_update: false,
            validate_submitter: false,
            list_limit: driv_common::DEFAULT_LIST_LIMIT,
        }
    }
}

/// Death verification service
#[derive(Debug)]
pub struct DeathVerificationService {
    config: SubmissionConfig,
    records: Records,
    verifier: Arc<QuorumVerifier>,
}

impl DeathVerificationService {
    pub fn new(config: SubmissionConfig, records: Records, verifier: Arc<QuorumVerifier>) -> Self {
        Self {
            config,
            records,
            verifier,
        }
    }

    pub fn verifier(&self) -> &Arc<QuorumVerifier> {
        &self.verifier
    }

    /// Submit death evidence for a vault owned by `actor`
    ///
    /// Returns the created record whether or not quorum was reached. If the
    /// unlock write fails the record stays persisted and the storage error is
    /// returned; [`Self::recheck`] re-applies the quorum later.
    #[instrument(skip(self, request), fields(user_id = %actor.user_id, vault_id = %request.vault_id))]
    pub async fn submit(
        &self,
        actor: &Actor,
        request: DeathVerificationCreate,
    ) -> Result<DeathVerification> {
        require_owned_vault(&self.records, actor, &request.vault_id).await?;

        if self.config.validate_submitter {
            let party: Option<TrustedParty> = self
                .records
                .find_one(
                    Collection::TrustedParties,
                    &Filter::new()
                        .with("id", request.submitted_by.as_str())
                        .with("vault_id", request.vault_id.as_str()),
                )
                .await?;
            if party.is_none() {
                warn!(submitted_by = %request.submitted_by, "Submitter is not a trusted party of the vault");
                return Err(VaultError::Validation(format!(
                    "submitter {} is not a trusted party of vault {}",
                    request.submitted_by, request.vault_id
                )));
            }
        }

        let verification = DeathVerification::new(actor.user_id.as_str(), request);
        self.records
            .insert(Collection::DeathVerifications, &verification)
            .await?;

        info!(
            verification_id = %verification.id,
            evidence_type = %verification.evidence_type,
            "Death verification submitted"
        );

        if let Err(e) = self.verifier.evaluate(&verification.vault_id).await {
            error!(
                verification_id = %verification.id,
                vault_id = %verification.vault_id,
                error = %e,
                "Quorum evaluation failed after submission was stored"
            );
            return Err(e);
        }

        Ok(verification)
    }

    /// Move a verification owned by `actor` to `status`
    ///
    /// `status` is the wire form (`pending`, `verified`, `rejected`).
    #[instrument(skip(self), fields(user_id = %actor.user_id))]
    pub async fn update_status(
        &self,
        actor: &Actor,
        verification_id: &str,
        status: &str,
    ) -> Result<DeathVerification> {
        let next: VerificationStatus = status.parse()?;
        let owned = Filter::new()
            .with("id", verification_id)
            .with("user_id", actor.user_id.as_str());

        let current: DeathVerification = self
            .records
            .find_one(Collection::DeathVerifications, &owned)
            .await?
            .ok_or_else(|| VaultError::not_found("Verification", verification_id))?;

        if !current.status.can_transition_to(next) {
            return Err(VaultError::InvalidTransition {
                from: current.status,
                to: next,
            });
        }

        let verified_at = (next == VerificationStatus::Verified).then(Utc::now);
        let mut update = Update::new().set("status", next.as_str());
        if let Some(at) = verified_at {
            update = update.set("verified_at", serde_json::to_value(at)?);
        }

        // Guard on the observed status so racing reviews cannot both apply
        let guarded = owned.clone().with("status", current.status.as_str());
        let modified = self
            .records
            .update_one(Collection::DeathVerifications, &guarded, &update)
            .await?;
        if modified == 0 {
            let latest: Option<DeathVerification> = self
                .records
                .find_one(Collection::DeathVerifications, &owned)
                .await?;
            return Err(match latest {
                Some(latest) => VaultError::InvalidTransition {
                    from: latest.status,
                    to: next,
                },
                None => VaultError::not_found("Verification", verification_id),
            });
        }

        info!(
            verification_id = %verification_id,
            vault_id = %current.vault_id,
            status = %next,
            "Verification status updated"
        );

        if self.config.retrigger_on_status_update {
            if let Err(e) = self.verifier.evaluate(&current.vault_id).await {
                error!(
                    verification_id = %verification_id,
                    vault_id = %current.vault_id,
                    status = %next,
                    error = %e,
                    "Quorum evaluation failed after status update was stored"
                );
                return Err(e);
            }
        }

        Ok(DeathVerification {
            status: next,
            verified_at,
            ..current
        })
    }

    /// Verifications filed by `actor`, optionally for one vault
    pub async fn list(&self, actor: &Actor, vault_id: Option<&str>) -> Result<Vec<DeathVerification>> {
        let filter = Filter::new()
            .with("user_id", actor.user_id.as_str())
            .with_opt("vault_id", vault_id);
        self.records
            .find(
                Collection::DeathVerifications,
                &filter,
                Some(self.config.list_limit),
            )
            .await
    }

    /// Re-run the quorum verifier for a vault owned by `actor`
    #[instrument(skip(self), fields(user_id = %actor.user_id))]
    pub async fn recheck(&self, actor: &Actor, vault_id: &str) -> Result<QuorumOutcome> {
        require_owned_vault(&self.records, actor, vault_id).await?;
        self.verifier.evaluate(vault_id).await
    }
}
