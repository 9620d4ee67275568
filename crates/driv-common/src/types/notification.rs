//! In-app notification addressed to a user

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    #[default]
    Info,
    Warning,
    Alert,
    Success,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub message: String,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    #[serde(default)]
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationCreate {
    pub title: String,
    pub message: String,
    #[serde(default, rename = "type")]
    pub kind: NotificationKind,
}

impl Notification {
    pub fn new(user_id: impl Into<String>, create: NotificationCreate) -> Self {
        Self {
            id: crate::new_id(),
            user_id: user_id.into(),
            title: create.title,
            message: create.message,
            kind: create.kind,
            is_read: false,
            created_at: Utc::now(),
        }
    }
}
