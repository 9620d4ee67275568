//! In-memory document store
//!
//! Uses DashMap keyed by collection. Each operation holds the collection's
//! shard lock for its whole duration, so a filtered `update_one` is atomic
//! with respect to other writers on the same collection.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use dashmap::DashMap;
use driv_common::StoreError;
use tracing::debug;

use super::document::{Collection, Document, DocumentStore, Filter, Update};

/// In-memory storage implementation
#[derive(Debug, Default)]
pub struct InMemoryStore {
    collections: DashMap<Collection, Vec<Document>>,
    closed: AtomicBool,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn ensure_open(&self) -> Result<(), StoreError> {
        if self.closed.load(Ordering::Acquire) {
            return Err(StoreError::Closed);
        }
        Ok(())
    }

    /// Get statistics about the store
    pub fn stats(&self) -> StoreStats {
        let documents = self.collections.iter().map(|c| c.len()).sum();
        StoreStats {
            collections: self.collections.len(),
            documents,
        }
    }
}

/// Statistics about the document store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreStats {
    pub collections: usize,
    pub documents: usize,
}

#[async_trait]
impl DocumentStore for InMemoryStore {
    async fn insert_one(&self, collection: Collection, doc: Document) -> Result<(), StoreError> {
        self.ensure_open()?;
        self.collections.entry(collection).or_default().push(doc);
        Ok(())
    }

    async fn find(
        &self,
        collection: Collection,
        filter: &Filter,
        limit: Option<usize>,
    ) -> Result<Vec<Document>, StoreError> {
        self.ensure_open()?;
        let Some(docs) = self.collections.get(&collection) else {
            return Ok(Vec::new());
        };
        Ok(docs
            .iter()
            .filter(|d| filter.matches(d))
            .take(limit.unwrap_or(usize::MAX))
            .cloned()
            .collect())
    }

    async fn count(&self, collection: Collection, filter: &Filter) -> Result<usize, StoreError> {
        self.ensure_open()?;
        Ok(self
            .collections
            .get(&collection)
            .map(|docs| docs.iter().filter(|d| filter.matches(d)).count())
            .unwrap_or(0))
    }

    async fn update_one(
        &self,
        collection: Collection,
        filter: &Filter,
        update: &Update,
    ) -> Result<usize, StoreError> {
        self.ensure_open()?;
        let Some(mut docs) = self.collections.get_mut(&collection) else {
            return Ok(0);
        };
        let modified = match docs.iter_mut().find(|d| filter.matches(d)) {
            Some(doc) => usize::from(update.apply(doc)),
            None => 0,
        };
        debug!(collection = %collection, modified, "update_one");
        Ok(modified)
    }

    async fn delete_one(
        &self,
        collection: Collection,
        filter: &Filter,
    ) -> Result<usize, StoreError> {
        self.ensure_open()?;
        let Some(mut docs) = self.collections.get_mut(&collection) else {
            return Ok(0);
        };
        match docs.iter().position(|d| filter.matches(d)) {
            Some(index) => {
                docs.remove(index);
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn close(&self) -> Result<(), StoreError> {
        self.closed.store(true, Ordering::Release);
        debug!("In-memory store closed");
        Ok(())
    }
}
