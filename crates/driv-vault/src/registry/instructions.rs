//! Legacy instructions attached to vaults

use driv_common::{Actor, LegacyInstruction, LegacyInstructionCreate, Result, VaultError};
use tracing::{info, instrument};

use super::vaults::require_owned_vault;
use crate::store::{Collection, Filter, Records};

#[derive(Debug, Clone)]
pub struct InstructionService {
    records: Records,
    list_limit: usize,
}

impl InstructionService {
    pub fn new(records: Records, list_limit: usize) -> Self {
        Self { records, list_limit }
    }

    #[instrument(skip(self, create), fields(user_id = %actor.user_id, vault_id = %create.vault_id))]
    pub async fn create(
        &self,
        actor: &Actor,
        create: LegacyInstructionCreate,
    ) -> Result<LegacyInstruction> {
        require_owned_vault(&self.records, actor, &create.vault_id).await?;
        let instruction = LegacyInstruction::new(actor.user_id.as_str(), create);
        self.records
            .insert(Collection::LegacyInstructions, &instruction)
            .await?;
        info!(instruction_id = %instruction.id, "Legacy instruction stored");
        Ok(instruction)
    }

    pub async fn list(
        &self,
        actor: &Actor,
        vault_id: Option<&str>,
    ) -> Result<Vec<LegacyInstruction>> {
        let filter = Filter::new()
            .with("user_id", actor.user_id.as_str())
            .with_opt("vault_id", vault_id);
        self.records
            .find(Collection::LegacyInstructions, &filter, Some(self.list_limit))
            .await
    }

    pub async fn delete(&self, actor: &Actor, instruction_id: &str) -> Result<()> {
        let deleted = self
            .records
            .delete_one(
                Collection::LegacyInstructions,
                &Filter::new()
                    .with("id", instruction_id)
                    .with("user_id", actor.user_id.as_str()),
            )
            .await?;
        if deleted == 0 {
            return Err(VaultError::not_found("Legacy instruction", instruction_id));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemoryStore;
    use driv_common::{ActionType, Vault};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_instructions_scoped_to_owner_and_vault() {
        let records = Records::new(Arc::new(InMemoryStore::new()));
        let first = Vault::primary("alice");
        let second = Vault::primary("alice");
        records.insert(Collection::Vaults, &first).await.unwrap();
        records.insert(Collection::Vaults, &second).await.unwrap();
        let service = InstructionService::new(records, 100);
        let alice = Actor::new("alice");

        let create = |vault_id: &str| LegacyInstructionCreate {
            vault_id: vault_id.to_string(),
            action_type: ActionType::SendMessage,
            title: "Letter to family".into(),
            description: None,
            target_email: Some("family@example.com".into()),
            message_content: Some("Thank you for everything.".into()),
            delay_days: 7,
        };
        let a = service.create(&alice, create(&first.id)).await.unwrap();
        let b = service.create(&alice, create(&second.id)).await.unwrap();
        assert!(!a.is_executed);
        assert_eq!(a.delay_days, 7);

        assert_eq!(service.list(&alice, Some(&second.id)).await.unwrap(), vec![b]);
        assert_eq!(service.list(&alice, None).await.unwrap().len(), 2);

        let bob = Actor::new("bob");
        assert!(service.list(&bob, None).await.unwrap().is_empty());
        assert!(service.delete(&bob, &a.id).await.unwrap_err().is_not_found());
        service.delete(&alice, &a.id).await.unwrap();
        assert!(service.delete(&alice, &a.id).await.unwrap_err().is_not_found());
    }
}
