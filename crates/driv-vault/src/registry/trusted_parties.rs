//! Trusted parties designated by vault owners
//!
//! Parties with the verifier role form the denominator of a vault's unlock
//! quorum. Each new party is told about the designation by email.

use std::sync::Arc;

use driv_common::{Actor, Result, RoleType, TrustedParty, TrustedPartyCreate, VaultError};
use tracing::{info, instrument};

use super::vaults::require_owned_vault;
use crate::notify::{send_best_effort, Message, NotificationDispatcher};
use crate::store::{Collection, Filter, Records};

pub struct TrustedPartyService {
    records: Records,
    dispatcher: Arc<dyn NotificationDispatcher>,
    list_limit: usize,
}

impl TrustedPartyService {
    pub fn new(
        records: Records,
        dispatcher: Arc<dyn NotificationDispatcher>,
        list_limit: usize,
    ) -> Self {
        Self {
            records,
            dispatcher,
            list_limit,
        }
    }

    #[instrument(skip(self, create), fields(user_id = %actor.user_id, vault_id = %create.vault_id))]
    pub async fn create(&self, actor: &Actor, create: TrustedPartyCreate) -> Result<TrustedParty> {
        require_owned_vault(&self.records, actor, &create.vault_id).await?;
        let party = TrustedParty::new(actor.user_id.as_str(), create);
        self.records
            .insert(Collection::TrustedParties, &party)
            .await?;
        info!(party_id = %party.id, role = %party.role, "Trusted party added");

        send_best_effort(
            self.dispatcher.as_ref(),
            Message::new(
                party.email.as_str(),
                "You've been added as a trusted party",
                format!(
                    "You have been designated as a {} for {}'s digital vault.",
                    party.role, actor.user_id
                ),
            ),
        )
        .await;

        Ok(party)
    }

    pub async fn list(&self, actor: &Actor, vault_id: Option<&str>) -> Result<Vec<TrustedParty>> {
        let filter = Filter::new()
            .with("user_id", actor.user_id.as_str())
            .with_opt("vault_id", vault_id);
        self.records
            .find(Collection::TrustedParties, &filter, Some(self.list_limit))
            .await
    }

    /// Verifier-role parties of a vault owned by `actor`
    pub async fn verifiers(&self, actor: &Actor, vault_id: &str) -> Result<Vec<TrustedParty>> {
        require_owned_vault(&self.records, actor, vault_id).await?;
        self.records
            .find(
                Collection::TrustedParties,
                &Filter::new()
                    .with("vault_id", vault_id)
                    .with("role", RoleType::Verifier.as_str()),
                Some(self.list_limit),
            )
            .await
    }

    pub async fn delete(&self, actor: &Actor, party_id: &str) -> Result<()> {
        let deleted = self
            .records
            .delete_one(
                Collection::TrustedParties,
                &Filter::new()
                    .with("id", party_id)
                    .with("user_id", actor.user_id.as_str()),
            )
            .await?;
        if deleted == 0 {
            return Err(VaultError::not_found("Trusted party", party_id));
        }
        Ok(())
    }
}

impl std::fmt::Debug for TrustedPartyService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrustedPartyService")
            .field("list_limit", &self.list_limit)
            .finish_non_exhaustive()
    }
}
