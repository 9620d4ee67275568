//! Verification module
//!
//! This module provides:
//! - The quorum verifier that unlocks a vault once enough evidence is verified
//! - The death verification service (submit, review, list, recheck)

pub mod service;
pub mod verifier;

pub use service::{DeathVerificationService, SubmissionConfig};
pub use verifier::{QuorumOutcome, QuorumVerifier, UnlockWrite, VerifierConfig};
