//! Vault records

use driv_common::{Actor, Result, Vault, VaultCreate, VaultError};
use tracing::{info, instrument};

use crate::store::{Collection, Filter, Records};

/// Load a vault by id, requiring that `actor` owns it
pub(crate) async fn require_owned_vault(
    records: &Records,
    actor: &Actor,
    vault_id: &str,
) -> Result<Vault> {
    records
        .find_one(
            Collection::Vaults,
            &Filter::new()
                .with("id", vault_id)
                .with("user_id", actor.user_id.as_str()),
        )
        .await?
        .ok_or_else(|| VaultError::not_found("Vault", vault_id))
}

#[derive(Debug, Clone)]
pub struct VaultService {
    records: Records,
    list_limit: usize,
}

impl VaultService {
    pub fn new(records: Records, list_limit: usize) -> Self {
        Self { records, list_limit }
    }

    #[instrument(skip(self, create), fields(user_id = %actor.user_id))]
    pub async fn create(&self, actor: &Actor, create: VaultCreate) -> Result<Vault> {
        let vault = Vault::new(actor.user_id.as_str(), create);
        self.records.insert(Collection::Vaults, &vault).await?;
        info!(vault_id = %vault.id, "Vault created");
        Ok(vault)
    }

    pub async fn get(&self, actor: &Actor, vault_id: &str) -> Result<Vault> {
        require_owned_vault(&self.records, actor, vault_id).await
    }

    pub async fn list(&self, actor: &Actor) -> Result<Vec<Vault>> {
        self.records
            .find(
                Collection::Vaults,
                &Filter::new().with("user_id", actor.user_id.as_str()),
                Some(self.list_limit),
            )
            .await
    }
}
