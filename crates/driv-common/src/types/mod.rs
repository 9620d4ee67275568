//! Record types persisted by the DRIV vault

pub mod asset;
pub mod death_verification;
pub mod legacy_instruction;
pub mod notification;
pub mod subscription;
pub mod trusted_party;
pub mod user;
pub mod vault;
