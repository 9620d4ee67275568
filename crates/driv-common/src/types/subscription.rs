//! Subscription - recurring service the owner pays for

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BillingCycle {
    Monthly,
    Yearly,
}

impl BillingCycle {
    pub fn as_str(&self) -> &'static str {
        match self {
            BillingCycle::Monthly => "monthly",
            BillingCycle::Yearly => "yearly",
        }
    }
}

impl std::fmt::Display for BillingCycle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subscription {
    pub id: String,
    pub user_id: String,
    pub service_name: String,
    pub category: String,
    pub amount: f64,
    pub billing_cycle: BillingCycle,
    pub last_payment_date: Option<DateTime<Utc>>,
    /// Cancel the subscription once the vault unlocks
    #[serde(default)]
    pub auto_cancel_enabled: bool,
    #[serde(default)]
    pub oauth_connected: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubscriptionCreate {
    pub service_name: String,
    pub category: String,
    pub amount: f64,
    pub billing_cycle: BillingCycle,
    #[serde(default)]
    pub auto_cancel_enabled: bool,
}

impl Subscription {
    pub fn new(user_id: impl Into<String>, create: SubscriptionCreate) -> Self {
        Self {
            id: crate::new_id(),
            user_id: user_id.into(),
            service_name: create.service_name,
            category: create.category,
            amount: create.amount,
            billing_cycle: create.billing_cycle,
            last_payment_date: None,
            auto_cancel_enabled: create.auto_cancel_enabled,
            oauth_connected: false,
            created_at: Utc::now(),
        }
    }
}
