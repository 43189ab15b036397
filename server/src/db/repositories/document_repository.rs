use serde_json::{Map, Value};
use std::marker::PhantomData;
use std::sync::Arc;
use uuid::Uuid;

use crate::db::document_store::{DocumentStore, StoredDocument};
use crate::error::{AppError, AppResult};
use crate::models::document::{to_object, Document, Record};

/// Typed access to one collection of the document store.
pub struct DocumentRepository<T> {
    store: Arc<dyn DocumentStore>,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Document> DocumentRepository<T> {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            store,
            _marker: PhantomData,
        }
    }

    fn not_found() -> AppError {
        AppError::NotFound(format!("{} not found", T::LABEL))
    }

    fn decode(stored: StoredDocument) -> AppResult<Record<T>> {
        let document = serde_json::from_value(Value::Object(stored.body)).map_err(|e| {
            AppError::Database(format!(
                "Stored {} {} does not match its schema: {}",
                T::LABEL,
                stored.id,
                e
            ))
        })?;
        Ok(Record {
            id: stored.id,
            document,
        })
    }

    // Insert a new document under a fresh id
    pub async fn insert(&self, document: T) -> AppResult<Record<T>> {
        let id = Uuid::new_v4();
        let body = to_object(&document)?;
        self.store.insert(T::COLLECTION, id, body).await?;
        log::debug!("Inserted {} {}", T::LABEL, id);
        Ok(Record { id, document })
    }

    pub async fn list(&self) -> AppResult<Vec<Record<T>>> {
        self.store
            .find_all(T::COLLECTION)
            .await?
            .into_iter()
            .map(Self::decode)
            .collect()
    }

    pub async fn get(&self, id: Uuid) -> AppResult<Record<T>> {
        let stored = self
            .store
            .find_by_id(T::COLLECTION, id)
            .await?
            .ok_or_else(Self::not_found)?;
        Self::decode(stored)
    }

    /// Raw stored fields, used as the base for partial updates.
    pub async fn get_fields(&self, id: Uuid) -> AppResult<Map<String, Value>> {
        self.store
            .find_by_id(T::COLLECTION, id)
            .await?
            .map(|stored| stored.body)
            .ok_or_else(Self::not_found)
    }

    pub async fn exists(&self, id: Uuid) -> AppResult<bool> {
        Ok(self.store.find_by_id(T::COLLECTION, id).await?.is_some())
    }

    pub async fn find_by(&self, field: &str, value: &Value) -> AppResult<Vec<Record<T>>> {
        self.store
            .find_by_field(T::COLLECTION, field, value)
            .await?
            .into_iter()
            .map(Self::decode)
            .collect()
    }

    pub async fn replace(&self, id: Uuid, document: T) -> AppResult<Record<T>> {
        let body = to_object(&document)?;
        if !self.store.replace(T::COLLECTION, id, body).await? {
            return Err(Self::not_found());
        }
        log::debug!("Updated {} {}", T::LABEL, id);
        Ok(Record { id, document })
    }

    // Delete is not idempotent: a second delete of the same id is NotFound
    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        if !self.store.delete(T::COLLECTION, id).await? {
            return Err(Self::not_found());
        }
        log::debug!("Deleted {} {}", T::LABEL, id);
        Ok(())
    }
}
