use log::info;
use serde_json::{Map, Value};
use std::sync::Arc;
use uuid::Uuid;

use crate::db::document_store::DocumentStore;
use crate::db::repositories::DocumentRepository;
use crate::error::{AppError, AppResult};
use crate::models::document::{from_fields, into_fields, Document, Record, ID_FIELD};

/// Create/read/update/delete for one document type, with validation and
/// reference checks applied before anything is written.
pub struct ResourceService<T> {
    store: Arc<dyn DocumentStore>,
    repository: DocumentRepository<T>,
}

impl<T: Document> ResourceService<T> {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            repository: DocumentRepository::new(store.clone()),
            store,
        }
    }

    fn reject_id(fields: &Map<String, Value>) -> AppResult<()> {
        if fields.contains_key(ID_FIELD) {
            return Err(AppError::Validation(format!("Field '{}' cannot be set", ID_FIELD)));
        }
        Ok(())
    }

    /// Validates a raw body and stores it as a new record.
    pub async fn create(&self, body: Value) -> AppResult<Record<T>> {
        let mut fields = into_fields(body)?;
        Self::reject_id(&fields)?;
        T::prepare_fields(&mut fields)?;

        let document: T = from_fields(fields)?;
        document.validate()?;
        document.check_constraints(None, &self.store).await?;

        let record = self.repository.insert(document).await?;
        info!("Created {} {}", T::LABEL.to_lowercase(), record.id);
        Ok(record)
    }

    pub async fn list(&self) -> AppResult<Vec<Record<T>>> {
        self.repository.list().await
    }

    pub async fn get(&self, id: Uuid) -> AppResult<Record<T>> {
        self.repository.get(id).await
    }

    /// Records whose `field` equals `value`.
    pub async fn find_by(&self, field: &str, value: &Value) -> AppResult<Vec<Record<T>>> {
        self.repository.find_by(field, value).await
    }

    /// Applies a partial patch over the stored fields. The merged document
    /// must pass the same checks as a new one.
    pub async fn update(&self, id: Uuid, patch: Value) -> AppResult<Record<T>> {
        let mut patch = into_fields(patch)?;
        // Full records echoed back by clients carry their own id
        if let Some(echoed) = patch.remove(ID_FIELD) {
            if echoed != Value::String(id.to_string()) {
                return Err(AppError::Validation(format!("Field '{}' cannot be changed", ID_FIELD)));
            }
        }

        let mut fields = self.repository.get_fields(id).await?;
        T::prepare_fields(&mut patch)?;
        fields.extend(patch);

        let document: T = from_fields(fields)?;
        document.validate()?;
        document.check_constraints(Some(id), &self.store).await?;

        let record = self.repository.replace(id, document).await?;
        info!("Updated {} {}", T::LABEL.to_lowercase(), id);
        Ok(record)
    }

    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        self.repository.delete(id).await?;
        info!("Deleted {} {}", T::LABEL.to_lowercase(), id);
        Ok(())
    }
}
