//! Document store interface
//!
//! Records are stored as JSON objects grouped into collections. Queries are
//! conjunctions of field-equality tests and updates set individual fields,
//! which is all the vault services need from a backend.

use async_trait::async_trait;
use driv_common::StoreError;
use serde_json::{Map, Value};

/// A stored record
pub type Document = Map<String, Value>;

/// Named record collections
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Users,
    Vaults,
    Assets,
    LegacyInstructions,
    TrustedParties,
    DeathVerifications,
    Notifications,
    Subscriptions,
}

impl Collection {
    pub fn name(&self) -> &'static str {
        match self {
            Collection::Users => "users",
            Collection::Vaults => "vaults",
            Collection::Assets => "assets",
            Collection::LegacyInstructions => "legacy_instructions",
            Collection::TrustedParties => "trusted_parties",
            Collection::DeathVerifications => "death_verifications",
            Collection::Notifications => "notifications",
            Collection::Subscriptions => "subscriptions",
        }
    }
}

impl std::fmt::Display for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Conjunction of field-equality tests; empty matches everything
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    clauses: Vec<(String, Value)>,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Require `field == value`
    pub fn with(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.clauses.push((field.into(), value.into()));
        self
    }

    /// Add `field == value` only when a value is given
    pub fn with_opt(self, field: impl Into<String>, value: Option<impl Into<Value>>) -> Self {
        match value {
            Some(v) => self.with(field, v),
            None => self,
        }
    }

    /// A missing field only matches a null clause
    pub fn matches(&self, doc: &Document) -> bool {
        self.clauses
            .iter()
            .all(|(field, expected)| doc.get(field).unwrap_or(&Value::Null) == expected)
    }
}

/// Field assignments applied to a matched document
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Update {
    fields: Vec<(String, Value)>,
}

impl Update {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.push((field.into(), value.into()));
        self
    }

    /// Apply in place; returns whether any field value changed
    pub fn apply(&self, doc: &mut Document) -> bool {
        let mut changed = false;
        for (field, value) in &self.fields {
            if doc.get(field) != Some(value) {
                doc.insert(field.clone(), value.clone());
                changed = true;
            }
        }
        changed
    }
}

/// Trait for document storage backends
///
/// `update_one` and `delete_one` act on the first matching document and
/// return how many documents were modified. An update whose assignments leave
/// the document unchanged counts as zero, so a filter plus update works as a
/// compare-and-set.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn insert_one(&self, collection: Collection, doc: Document) -> Result<(), StoreError>;

    /// Matching documents in insertion order, up to `limit`
    async fn find(
        &self,
        collection: Collection,
        filter: &Filter,
        limit: Option<usize>,
    ) -> Result<Vec<Document>, StoreError>;

    async fn find_one(
        &self,
        collection: Collection,
        filter: &Filter,
    ) -> Result<Option<Document>, StoreError> {
        Ok(self.find(collection, filter, Some(1)).await?.into_iter().next())
    }

    async fn count(&self, collection: Collection, filter: &Filter) -> Result<usize, StoreError>;

    async fn update_one(
        &self,
        collection: Collection,
        filter: &Filter,
        update: &Update,
    ) -> Result<usize, StoreError>;

    async fn delete_one(&self, collection: Collection, filter: &Filter)
        -> Result<usize, StoreError>;

    /// Release the backend; later calls fail with [`StoreError::Closed`]
    async fn close(&self) -> Result<(), StoreError>;
}
