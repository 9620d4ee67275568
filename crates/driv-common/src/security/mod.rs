//! Security module - acting identity for vault operations
//!
//! Token encoding and password hashing live outside this crate; every vault
//! operation only needs to know which user is acting.

pub mod principal;

pub use principal::{Actor, Authenticator, StaticAuthenticator};
