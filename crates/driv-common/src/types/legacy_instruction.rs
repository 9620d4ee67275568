//! LegacyInstruction - action to carry out after the owner's death

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionType {
    SendMessage,
    DeleteAccount,
    TransferAsset,
    Donate,
    Notify,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegacyInstruction {
    pub id: String,
    pub vault_id: String,
    pub user_id: String,
    pub action_type: ActionType,
    pub title: String,
    pub description: Option<String>,
    pub target_email: Option<String>,
    pub message_content: Option<String>,
    /// Days to wait after unlock before executing
    #[serde(default)]
    pub delay_days: u32,
    #[serde(default)]
    pub is_executed: bool,
    pub execution_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LegacyInstructionCreate {
    pub vault_id: String,
    pub action_type: ActionType,
    pub title: String,
    pub description: Option<String>,
    pub target_email: Option<String>,
    pub message_content: Option<String>,
    #[serde(default)]
    pub delay_days: u32,
}

impl LegacyInstruction {
    pub fn new(user_id: impl Into<String>, create: LegacyInstructionCreate) -> Self {
        Self {
            id: crate::new_id(),
            vault_id: create.vault_id,
            user_id: user_id.into(),
            action_type: create.action_type,
            title: create.title,
            description: create.description,
            target_email: create.target_email,
            message_content: create.message_content,
            delay_days: create.delay_days,
            is_executed: false,
            execution_date: None,
            created_at: Utc::now(),
        }
    }
}
