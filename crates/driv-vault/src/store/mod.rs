//! Persistence layer
//!
//! - [`DocumentStore`]: backend trait over JSON documents
//! - [`InMemoryStore`]: DashMap-backed backend
//! - [`Records`]: typed, serde-encoded access shared by the services

pub mod document;
pub mod memory;
pub mod records;

pub use document::{Collection, Document, DocumentStore, Filter, Update};
pub use memory::{InMemoryStore, StoreStats};
pub use records::Records;
