//! Recurring subscriptions tracked per owner

use driv_common::{Actor, Result, Subscription, SubscriptionCreate, VaultError};
use tracing::{info, instrument};

use crate::store::{Collection, Filter, Records};

#[derive(Debug, Clone)]
pub struct SubscriptionService {
    records: Records,
    list_limit: usize,
}

impl SubscriptionService {
    pub fn new(records: Records, list_limit: usize) -> Self {
        Self { records, list_limit }
    }

    #[instrument(skip(self, create), fields(user_id = %actor.user_id, service = %create.service_name))]
    pub async fn create(&self, actor: &Actor, create: SubscriptionCreate) -> Result<Subscription> {
        if !create.amount.is_finite() || create.amount < 0.0 {
            return Err(VaultError::Validation(format!(
                "subscription amount must be a non-negative number, got {}",
                create.amount
            )));
        }
        let subscription = Subscription::new(actor.user_id.as_str(), create);
        self.records
            .insert(Collection::Subscriptions, &subscription)
            .await?;
        info!(
            subscription_id = %subscription.id,
            billing_cycle = %subscription.billing_cycle,
            "Subscription stored"
        );
        Ok(subscription)
    }

    pub async fn list(&self, actor: &Actor) -> Result<Vec<Subscription>> {
        self.records
            .find(
                Collection::Subscriptions,
                &Filter::new().with("user_id", actor.user_id.as_str()),
                Some(self.list_limit),
            )
            .await
    }

    pub async fn delete(&self, actor: &Actor, subscription_id: &str) -> Result<()> {
        let deleted = self
            .records
            .delete_one(
                Collection::Subscriptions,
                &Filter::new()
                    .with("id", subscription_id)
                    .with("user_id", actor.user_id.as_str()),
            )
            .await?;
        if deleted == 0 {
            return Err(VaultError::not_found("Subscription", subscription_id));
        }
        Ok(())
    }
}
