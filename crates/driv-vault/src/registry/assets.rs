//! Asset records held in vaults

use driv_common::{Actor, Asset, AssetCreate, Result, VaultError};
use tracing::{info, instrument};

use super::vaults::require_owned_vault;
use crate::store::{Collection, Filter, Records};

#[derive(Debug, Clone)]
pub struct AssetService {
    records: Records,
    list_limit: usize,
}

impl AssetService {
    pub fn new(records: Records, list_limit: usize) -> Self {
        Self { records, list_limit }
    }

    #[instrument(skip(self, create), fields(user_id = %actor.user_id, vault_id = %create.vault_id))]
    pub async fn create(&self, actor: &Actor, create: AssetCreate) -> Result<Asset> {
        require_owned_vault(&self.records, actor, &create.vault_id).await?;
        let asset = Asset::new(actor.user_id.as_str(), create);
        self.records.insert(Collection::Assets, &asset).await?;
        info!(asset_id = %asset.id, category = %asset.category, "Asset stored");
        Ok(asset)
    }

    pub async fn list(&self, actor: &Actor, vault_id: Option<&str>) -> Result<Vec<Asset>> {
        let filter = Filter::new()
            .with("user_id", actor.user_id.as_str())
            .with_opt("vault_id", vault_id);
        self.records
            .find(Collection::Assets, &filter, Some(self.list_limit))
            .await
    }

    pub async fn delete(&self, actor: &Actor, asset_id: &str) -> Result<()> {
        let deleted = self
            .records
            .delete_one(
                Collection::Assets,
                &Filter::new()
                    .with("id", asset_id)
                    .with("user_id", actor.user_id.as_str()),
            )
            .await?;
        if deleted == 0 {
            return Err(VaultError::not_found("Asset", asset_id));
        }
        Ok(())
    }
}
