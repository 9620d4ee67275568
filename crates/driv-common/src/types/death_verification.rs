//! DeathVerification - evidence that a vault owner has died
//!
//! Lifecycle:
//!
//! ```text
//!            ┌──────────► verified (sets verified_at)
//!  pending ──┤
//!            └──────────► rejected
//! ```
//!
//! `verified` and `rejected` are terminal. Only `verified` records count
//! toward a vault's unlock quorum.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::VaultError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerificationStatus {
    #[default]
    Pending,
    Verified,
    Rejected,
}

impl VerificationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            VerificationStatus::Pending => "pending",
            VerificationStatus::Verified => "verified",
            VerificationStatus::Rejected => "rejected",
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, VerificationStatus::Pending)
    }

    /// Whether a record in this state may move to `next`
    pub fn can_transition_to(&self, next: VerificationStatus) -> bool {
        matches!(
            (self, next),
            (VerificationStatus::Pending, VerificationStatus::Verified)
                | (VerificationStatus::Pending, VerificationStatus::Rejected)
        )
    }
}

impl std::fmt::Display for VerificationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for VerificationStatus {
    type Err = VaultError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(VerificationStatus::Pending),
            "verified" => Ok(VerificationStatus::Verified),
            "rejected" => Ok(VerificationStatus::Rejected),
            other => Err(VaultError::Validation(format!(
                "unknown verification status: {other}"
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeathVerification {
    pub id: String,
    pub vault_id: String,
    /// Acting user who filed the submission
    pub user_id: String,
    /// Trusted party id the evidence is attributed to
    pub submitted_by: String,
    #[serde(default)]
    pub status: VerificationStatus,
    /// e.g. "death_certificate", "obituary", "government_record"
    pub evidence_type: String,
    pub evidence_url: Option<String>,
    pub notes: Option<String>,
    pub verified_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Submission request for a new death verification
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeathVerificationCreate {
    pub vault_id: String,
    pub submitted_by: String,
    pub evidence_type: String,
    pub evidence_url: Option<String>,
    pub notes: Option<String>,
}

impl DeathVerification {
    pub fn new(user_id: impl Into<String>, create: DeathVerificationCreate) -> Self {
        Self {
            id: crate::new_id(),
            vault_id: create.vault_id,
            user_id: user_id.into(),
            submitted_by: create.submitted_by,
            status: VerificationStatus::Pending,
            evidence_type: create.evidence_type,
            evidence_url: create.evidence_url,
            notes: create.notes,
            verified_at: None,
            created_at: Utc::now(),
        }
    }

    pub fn is_verified(&self) -> bool {
        self.status == VerificationStatus::Verified
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use VerificationStatus::*;

    #[test]
    fn test_only_pending_moves() {
        assert!(Pending.can_transition_to(Verified));
        assert!(Pending.can_transition_to(Rejected));
        assert!(!Pending.can_transition_to(Pending));

        for terminal in [Verified, Rejected] {
            assert!(terminal.is_terminal());
            for next in [Pending, Verified, Rejected] {
                assert!(!terminal.can_transition_to(next));
            }
        }
    }

    #[test]
    fn test_parse_status() {
        assert_eq!("verified".parse::<VerificationStatus>().unwrap(), Verified);
        let err = "approved".parse::<VerificationStatus>().unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_new_submission_is_pending() {
        let v = DeathVerification::new(
            "user-1",
            DeathVerificationCreate {
                vault_id: "vault-1".into(),
                submitted_by: "party-1".into(),
                evidence_type: "death_certificate".into(),
                evidence_url: None,
                notes: None,
            },
        );
        assert_eq!(v.status, Pending);
        assert!(v.verified_at.is_none());
        assert!(!v.is_verified());

        let doc = serde_json::to_value(&v).unwrap();
        assert_eq!(doc["status"], "pending");
        assert!(doc["verified_at"].is_null());
    }
}
