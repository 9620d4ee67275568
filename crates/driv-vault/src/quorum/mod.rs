//! Quorum module - unlock thresholds for death verification
//!
//! This module provides:
//! - The reference fractional threshold (`max(2, T * 0.66)`, float compare)
//! - The corrected two-thirds threshold (`max(2, ceil(2T / 3))`, integer)

pub mod policy;

pub use policy::{literal_threshold, two_thirds_threshold, QuorumPolicy};
