//! Collection-oriented persistence.
//!
//! Entities are stored as JSON documents keyed by `(collection, id)`. The
//! store validates nothing; schema checks happen in the resource services
//! before any write reaches it.

use async_trait::async_trait;
use dashmap::DashMap;
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::error::AppError;

/// A stored document: its id plus the JSON object body (without the id).
#[derive(Debug, Clone, PartialEq)]
pub struct StoredDocument {
    pub id: Uuid,
    pub body: Map<String, Value>,
}

#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn insert(&self, collection: &str, id: Uuid, body: Map<String, Value>) -> Result<(), AppError>;

    /// All documents of a collection in insertion order.
    async fn find_all(&self, collection: &str) -> Result<Vec<StoredDocument>, AppError>;

    async fn find_by_id(&self, collection: &str, id: Uuid) -> Result<Option<StoredDocument>, AppError>;

    /// Documents whose top-level `field` equals `value`.
    async fn find_by_field(
        &self,
        collection: &str,
        field: &str,
        value: &Value,
    ) -> Result<Vec<StoredDocument>, AppError>;

    /// Replaces the body of an existing document. Returns `false` if the id is absent.
    async fn replace(&self, collection: &str, id: Uuid, body: Map<String, Value>) -> Result<bool, AppError>;

    /// Removes a document. Returns `false` if the id is absent.
    async fn delete(&self, collection: &str, id: Uuid) -> Result<bool, AppError>;
}

/// Process-local store used by tests and when no database is configured.
#[derive(Debug, Default)]
pub struct MemoryDocumentStore {
    collections: DashMap<String, Vec<StoredDocument>>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn insert(&self, collection: &str, id: Uuid, body: Map<String, Value>) -> Result<(), AppError> {
        let mut documents = self.collections.entry(collection.to_string()).or_default();
        if documents.iter().any(|doc| doc.id == id) {
            return Err(AppError::Database(format!(
                "Duplicate id {} in collection {}",
                id, collection
            )));
        }
        documents.push(StoredDocument { id, body });
        Ok(())
    }

    async fn find_all(&self, collection: &str) -> Result<Vec<StoredDocument>, AppError> {
        Ok(self
            .collections
            .get(collection)
            .map(|documents| documents.clone())
            .unwrap_or_default())
    }

    async fn find_by_id(&self, collection: &str, id: Uuid) -> Result<Option<StoredDocument>, AppError> {
        Ok(self
            .collections
            .get(collection)
            .and_then(|documents| documents.iter().find(|doc| doc.id == id).cloned()))
    }

    async fn find_by_field(
        &self,
        collection: &str,
        field: &str,
        value: &Value,
    ) -> Result<Vec<StoredDocument>, AppError> {
        Ok(self
            .collections
            .get(collection)
            .map(|documents| {
                documents
                    .iter()
                    .filter(|doc| doc.body.get(field) == Some(value))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn replace(&self, collection: &str, id: Uuid, body: Map<String, Value>) -> Result<bool, AppError> {
        let Some(mut documents) = self.collections.get_mut(collection) else {
            return Ok(false);
        };
        match documents.iter_mut().find(|doc| doc.id == id) {
            Some(doc) => {
                doc.body = body;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, collection: &str, id: Uuid) -> Result<bool, AppError> {
        let Some(mut documents) = self.collections.get_mut(collection) else {
            return Ok(false);
        };
        let before = documents.len();
        documents.retain(|doc| doc.id != id);
        Ok(documents.len() < before)
    }
}
