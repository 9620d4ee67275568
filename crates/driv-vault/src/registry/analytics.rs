//! Dashboard analytics for an account

use std::collections::BTreeMap;

use driv_common::{Actor, Asset, Result};
use serde::{Deserialize, Serialize};

use crate::store::{Collection, Filter, Records};

/// Completion weight per stored asset
const ASSET_WEIGHT: usize = 20;
/// Completion weight per legacy instruction
const INSTRUCTION_WEIGHT: usize = 30;
/// Completion weight per trusted party
const PARTY_WEIGHT: usize = 50;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardSummary {
    pub vaults: usize,
    pub assets: usize,
    pub legacy_instructions: usize,
    pub trusted_parties: usize,
    pub verifications: usize,
    /// Asset count keyed by category name
    pub asset_breakdown: BTreeMap<String, usize>,
    /// Setup progress, 0-100
    pub completion_percentage: usize,
}

impl DashboardSummary {
    pub fn completion(assets: usize, instructions: usize, parties: usize) -> usize {
        (assets * ASSET_WEIGHT + instructions * INSTRUCTION_WEIGHT + parties * PARTY_WEIGHT)
            .min(100)
    }
}

#[derive(Debug, Clone)]
pub struct AnalyticsService {
    records: Records,
}

impl AnalyticsService {
    pub fn new(records: Records) -> Self {
        Self { records }
    }

    pub async fn dashboard(&self, actor: &Actor) -> Result<DashboardSummary> {
        let owned = Filter::new().with("user_id", actor.user_id.as_str());

        let vaults = self.records.count(Collection::Vaults, &owned).await?;
        let legacy_instructions = self
            .records
            .count(Collection::LegacyInstructions, &owned)
            .await?;
        let trusted_parties = self.records.count(Collection::TrustedParties, &owned).await?;
        let verifications = self
            .records
            .count(Collection::DeathVerifications, &owned)
            .await?;

        let assets: Vec<Asset> = self.records.find(Collection::Assets, &owned, None).await?;
        let mut asset_breakdown = BTreeMap::new();
        for asset in &assets {
            *asset_breakdown
                .entry(asset.category.as_str().to_string())
                .or_insert(0) += 1;
        }

        Ok(DashboardSummary {
            vaults,
            assets: assets.len(),
            legacy_instructions,
            trusted_parties,
            verifications,
            asset_breakdown,
            completion_percentage: DashboardSummary::completion(
                assets.len(),
                legacy_instructions,
                trusted_parties,
            ),
        })
    }
}
