//! Quorum thresholds for the 2-of-N style death-verification scheme
//!
//! `T` is the number of trusted parties with the verifier role and `V` the
//! number of death verifications in the `verified` state. Both thresholds are
//! floored at [`MIN_QUORUM`], so a vault with no registered verifiers still
//! unlocks after two verified attestations.

use driv_common::{MIN_QUORUM, REFERENCE_QUORUM_RATIO};
use serde::{Deserialize, Serialize};

/// Reference threshold: `max(2, T * 0.66)` as a float.
///
/// The comparison against the verified count is a float `>=`, so T=4 gives
/// 2.64 (three verified needed) and T=5 gives 3.3 (four needed).
#[inline]
pub fn literal_threshold(verifiers: usize) -> f64 {
    (MIN_QUORUM as f64).max(verifiers as f64 * REFERENCE_QUORUM_RATIO)
}

/// Corrected threshold: `max(2, ceil(2T / 3))` in integer arithmetic
#[inline]
pub fn two_thirds_threshold(verifiers: usize) -> usize {
    MIN_QUORUM.max((2 * verifiers).div_ceil(3))
}

/// Which threshold decides a vault's unlock
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuorumPolicy {
    /// Fractional `max(2, T * 0.66)` compared as floats
    #[default]
    Literal,
    /// Integer `max(2, ceil(2T / 3))`
    TwoThirds,
}

impl QuorumPolicy {
    /// Threshold for `verifiers` registered verifiers, for reporting
    pub fn threshold(&self, verifiers: usize) -> f64 {
        match self {
            QuorumPolicy::Literal => literal_threshold(verifiers),
            QuorumPolicy::TwoThirds => two_thirds_threshold(verifiers) as f64,
        }
    }

    /// Smallest verified count that meets the threshold
    pub fn required(&self, verifiers: usize) -> usize {
        match self {
            QuorumPolicy::Literal => literal_threshold(verifiers).ceil() as usize,
            QuorumPolicy::TwoThirds => two_thirds_threshold(verifiers),
        }
    }

    pub fn is_met(&self, verified: usize, verifiers: usize) -> bool {
        match self {
            QuorumPolicy::Literal => verified as f64 >= literal_threshold(verifiers),
            QuorumPolicy::TwoThirds => verified >= two_thirds_threshold(verifiers),
        }
    }
}

impl std::fmt::Display for QuorumPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QuorumPolicy::Literal => f.write_str("literal"),
            QuorumPolicy::TwoThirds => f.write_str("two_thirds"),
        }
    }
}

impl std::str::FromStr for QuorumPolicy {
    type Err = driv_common::VaultError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "literal" => Ok(QuorumPolicy::Literal),
            "two_thirds" => Ok(QuorumPolicy::TwoThirds),
            other => Err(driv_common::VaultError::Config(format!(
                "unknown quorum policy: {other}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_literal_threshold_table() {
        // (verifiers, smallest verified count that unlocks)
        let table = [(0, 2), (1, 2), (2, 2), (3, 2), (4, 3), (5, 4), (6, 4), (10, 7)];
        for (verifiers, needed) in table {
            let policy = QuorumPolicy::Literal;
            assert!(
                policy.is_met(needed, verifiers),
                "T={verifiers} should unlock at {needed}"
            );
            assert!(
                !policy.is_met(needed - 1, verifiers),
                "T={verifiers} should not unlock at {}",
                needed - 1
            );
            assert_eq!(policy.required(verifiers), needed);
        }
    }

    #[test]
    fn test_literal_threshold_is_fractional() {
        assert_eq!(literal_threshold(3), 2.0);
        assert!((literal_threshold(4) - 2.64).abs() < 1e-9);
        assert!((literal_threshold(5) - 3.3).abs() < 1e-9);
        assert!(!QuorumPolicy::Literal.is_met(3, 5));
    }

    #[test]
    fn test_two_thirds_threshold_table() {
        let table = [(0, 2), (1, 2), (3, 2), (4, 3), (5, 4), (6, 4), (9, 6), (10, 7)];
        for (verifiers, needed) in table {
            assert_eq!(two_thirds_threshold(verifiers), needed, "T={verifiers}");
        }
    }

    #[test]
    fn test_policies_diverge() {
        // 0.66 * 50 = 33.0 while ceil(2 * 50 / 3) = 34
        assert!(QuorumPolicy::Literal.is_met(33, 50));
        assert!(!QuorumPolicy::TwoThirds.is_met(33, 50));
    }

    #[test]
    fn test_policy_parse() {
        assert_eq!("two_thirds".parse::<QuorumPolicy>().unwrap(), QuorumPolicy::TwoThirds);
        assert!("majority".parse::<QuorumPolicy>().is_err());
    }

    proptest! {
        #[test]
        fn prop_literal_matches_float_compare(verified in 0usize..500, verifiers in 0usize..500) {
            let expected = verified as f64 >= f64::max(2.0, verifiers as f64 * 0.66);
            prop_assert_eq!(QuorumPolicy::Literal.is_met(verified, verifiers), expected);
        }

        #[test]
        fn prop_required_is_minimal(verifiers in 0usize..500) {
            for policy in [QuorumPolicy::Literal, QuorumPolicy::TwoThirds] {
                let required = policy.required(verifiers);
                prop_assert!(required >= MIN_QUORUM);
                prop_assert!(policy.is_met(required, verifiers));
                prop_assert!(!policy.is_met(required - 1, verifiers));
            }
        }

        #[test]
        fn prop_two_thirds_never_below_ratio(verifiers in 0usize..500) {
            let required = two_thirds_threshold(verifiers);
            prop_assert!(3 * required >= 2 * verifiers);
        }
    }
}
