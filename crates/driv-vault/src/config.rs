//! DRIV configuration

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::quorum::QuorumPolicy;
use crate::verification::{SubmissionConfig, UnlockWrite, VerifierConfig};

/// DRIV service configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DrivConfig {
    /// Quorum configuration
    pub quorum: QuorumSettings,
    /// Submission and review configuration
    pub verification: VerificationSettings,
    /// Storage configuration
    pub storage: StorageSettings,
}

impl DrivConfig {
    /// Load configuration from `.env` and `DRIV_*` environment variables
    pub fn load() -> Result<Self> {
        // Try to load .env file
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = Self::default();

        if let Some(val) = lookup("DRIV_QUORUM_POLICY") {
            cfg.quorum.policy = val
                .parse::<QuorumPolicy>()
                .with_context(|| format!("DRIV_QUORUM_POLICY={val}"))?;
        }
        if let Some(val) = lookup("DRIV_UNLOCK_WRITE") {
            cfg.quorum.unlock_write = val
                .parse::<UnlockWrite>()
                .with_context(|| format!("DRIV_UNLOCK_WRITE={val}"))?;
        }
        if let Some(val) = lookup("DRIV_NOTIFY_ON_UNLOCK") {
            cfg.quorum.notify_on_unlock = parse_flag("DRIV_NOTIFY_ON_UNLOCK", &val)?;
        }

        // Verification settings
        if let Some(val) = lookup("DRIV_RETRIGGER_ON_STATUS_UPDATE") {
            cfg.verification.retrigger_on_status_update =
                parse_flag("DRIV_RETRIGGER_ON_STATUS_UPDATE", &val)?;
        }
        if let Some(val) = lookup("DRIV_VALIDATE_SUBMITTER") {
            cfg.verification.validate_submitter = parse_flag("DRIV_VALIDATE_SUBMITTER", &val)?;
        }

        // Storage settings
        if let Some(val) = lookup("DRIV_LIST_LIMIT") {
            cfg.storage.list_limit = val
                .trim()
                .parse::<usize>()
                .with_context(|| format!("DRIV_LIST_LIMIT={val}"))?;
        }

        Ok(cfg)
    }

    /// Corrected threshold, race-free unlock, submitter checks, and re-evaluation on review
    pub fn hardened() -> Self {
        Self {
            quorum: QuorumSettings {
                policy: QuorumPolicy::TwoThirds,
                unlock_write: UnlockWrite::CompareAndSet,
                notify_on_unlock: true,
            },
            verification: VerificationSettings {
                retrigger_on_status_update: true,
                validate_submitter: true,
            },
            storage: StorageSettings::default(),
        }
    }

    pub fn verifier_config(&self) -> VerifierConfig {
        VerifierConfig {
            policy: self.quorum.policy,
            unlock_write: self.quorum.unlock_write,
            notify_on_unlock: self.quorum.notify_on_unlock,
        }
    }

    pub fn submission_config(&self) -> SubmissionConfig {
        SubmissionConfig {
            retrigger_on_status_update: self.verification.retrigger_on_status_update,
            validate_submitter: self.verification.validate_submitter,
            list_limit: self.storage.list_limit,
        }
    }
}

fn parse_flag(key: &str, val: &str) -> Result<bool> {
    match val.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => anyhow::bail!("{key} expects a boolean, got {val:?}"),
    }
}

/// Quorum settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QuorumSettings {
    /// Threshold applied to verified death verifications
    pub policy: QuorumPolicy,
    /// How the unlock is written
    pub unlock_write: UnlockWrite,
    /// Notify the vault owner when the vault unlocks
    pub notify_on_unlock: bool,
}

/// Submission and review settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationSettings {
    /// Re-run the quorum check when a verification's status changes
    pub retrigger_on_status_update: bool,
    /// Reject submissions whose submitter is not a trusted party of the vault
    pub validate_submitter: bool,
}

/// Storage settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageSettings {
    /// Maximum records returned by owner-scoped listings
    pub list_limit: usize,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            list_limit: driv_common::DEFAULT_LIST_LIMIT,
        }
    }
}
