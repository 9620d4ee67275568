//! Registered account holder

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    pub full_name: String,
    pub created_at: DateTime<Utc>,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

impl User {
    pub fn new(email: impl Into<String>, full_name: impl Into<String>) -> Self {
        Self {
            id: crate::new_id(),
            email: email.into(),
            full_name: full_name.into(),
            created_at: Utc::now(),
            is_active: true,
        }
    }
}
