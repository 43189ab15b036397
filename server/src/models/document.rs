use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use std::sync::Arc;
use uuid::Uuid;

use crate::db::document_store::DocumentStore;
use crate::error::{AppError, AppResult};
use crate::services::policy::Resource;

/// Name of the identifier field in every JSON record.
pub const ID_FIELD: &str = "_id";

/// An entity type persisted as a document in its own collection.
///
/// The serde shape of the type is its field schema: a body that does not
/// deserialize into `Self` fails validation.
#[async_trait]
pub trait Document: Serialize + DeserializeOwned + Send + Sync + 'static {
    const COLLECTION: &'static str;
    const RESOURCE: Resource;
    /// Response key for a single record.
    const SINGULAR: &'static str;
    /// Response key for a list of records.
    const PLURAL: &'static str;
    /// Used in error messages ("Plan not found").
    const LABEL: &'static str;

    /// Rewrites raw incoming fields (create body or update patch) before
    /// they are type-checked.
    fn prepare_fields(_fields: &mut Map<String, Value>) -> AppResult<()> {
        Ok(())
    }

    /// Semantic checks that the type system cannot express.
    fn validate(&self) -> AppResult<()> {
        Ok(())
    }

    /// Cross-document checks (references, uniqueness). `own_id` is set on updates.
    async fn check_constraints(&self, _own_id: Option<Uuid>, _store: &Arc<dyn DocumentStore>) -> AppResult<()> {
        Ok(())
    }

    /// Removes fields that must never leave the server.
    fn redact(_fields: &mut Map<String, Value>) {}
}

/// A document together with its generated id.
#[derive(Debug, Clone, PartialEq)]
pub struct Record<T> {
    pub id: Uuid,
    pub document: T,
}

impl<T: Document> Record<T> {
    /// JSON shape sent to clients: the document fields plus `_id`, redacted.
    pub fn to_response(&self) -> AppResult<Value> {
        let mut fields = to_object(&self.document)?;
        T::redact(&mut fields);
        fields.insert(ID_FIELD.to_string(), Value::String(self.id.to_string()));
        Ok(Value::Object(fields))
    }
}

/// Serializes a value that must be a JSON object.
pub fn to_object<T: Serialize>(value: &T) -> AppResult<Map<String, Value>> {
    match serde_json::to_value(value)? {
        Value::Object(map) => Ok(map),
        other => Err(AppError::Serialization(format!(
            "Expected a JSON object, got {}",
            other
        ))),
    }
}

/// Accepts a request body only if it is a JSON object.
pub fn into_fields(body: Value) -> AppResult<Map<String, Value>> {
    match body {
        Value::Object(map) => Ok(map),
        _ => Err(AppError::Validation("Request body must be a JSON object".to_string())),
    }
}

/// Deserializes fields into a document, reporting schema mismatches as validation errors.
pub fn from_fields<T: Document>(fields: Map<String, Value>) -> AppResult<T> {
    serde_json::from_value(Value::Object(fields))
        .map_err(|e| AppError::Validation(format!("Invalid {}: {}", T::LABEL.to_lowercase(), e)))
}

/// Parses a path id. Ids that are not UUIDs cannot resolve to a record.
pub fn parse_id<T: Document>(raw: &str) -> AppResult<Uuid> {
    Uuid::parse_str(raw).map_err(|_| AppError::NotFound(format!("{} not found", T::LABEL)))
}

/// Wraps a value under a single response key, e.g. `{"plan": {...}}`.
pub fn envelope(key: &str, value: Value) -> Value {
    let mut body = Map::new();
    body.insert(key.to_string(), value);
    Value::Object(body)
}

/// Shared check for string fields that must carry text.
pub fn require_non_empty(field: &str, value: &str) -> AppResult<()> {
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("Field '{}' must not be empty", field)));
    }
    Ok(())
}
