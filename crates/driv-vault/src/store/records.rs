//! Typed access to the document store
//!
//! Encodes records with serde on the way in and decodes them on the way out.
//! Timestamps cross the boundary as RFC 3339 strings.

use std::sync::Arc;

use driv_common::{Result, StoreError};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

use super::document::{Collection, Document, DocumentStore, Filter, Update};

/// Serialize a record into a storable document
pub fn encode<T: Serialize>(record: &T) -> Result<Document> {
    match serde_json::to_value(record)? {
        Value::Object(doc) => Ok(doc),
        _ => Err(StoreError::NotAnObject.into()),
    }
}

pub fn decode<T: DeserializeOwned>(doc: Document) -> Result<T> {
    Ok(serde_json::from_value(Value::Object(doc))?)
}

/// Shared handle over a document store
#[derive(Clone)]
pub struct Records {
    store: Arc<dyn DocumentStore>,
}

impl Records {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<dyn DocumentStore> {
        &self.store
    }

    pub async fn insert<T: Serialize + Sync>(&self, collection: Collection, record: &T) -> Result<()> {
        let doc = encode(record)?;
        self.store.insert_one(collection, doc).await?;
        Ok(())
    }

    pub async fn find<T: DeserializeOwned>(
        &self,
        collection: Collection,
        filter: &Filter,
        limit: Option<usize>,
    ) -> Result<Vec<T>> {
        self.store
            .find(collection, filter, limit)
            .await?
            .into_iter()
            .map(decode)
            .collect()
    }

    pub async fn find_one<T: DeserializeOwned>(
        &self,
        collection: Collection,
        filter: &Filter,
    ) -> Result<Option<T>> {
        self.store
            .find_one(collection, filter)
            .await?
            .map(decode)
            .transpose()
    }

    pub async fn count(&self, collection: Collection, filter: &Filter) -> Result<usize> {
        Ok(self.store.count(collection, filter).await?)
    }

    pub async fn update_one(
        &self,
        collection: Collection,
        filter: &Filter,
        update: &Update,
    ) -> Result<usize> {
        Ok(self.store.update_one(collection, filter, update).await?)
    }

    pub async fn delete_one(&self, collection: Collection, filter: &Filter) -> Result<usize> {
        Ok(self.store.delete_one(collection, filter).await?)
    }
}

impl std::fmt::Debug for Records {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Records").finish_non_exhaustive()
    }
}
