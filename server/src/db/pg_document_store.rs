use async_trait::async_trait;
use serde_json::{Map, Value};
use sqlx::PgPool;
use uuid::Uuid;

use crate::db::document_store::{DocumentStore, StoredDocument};
use crate::error::AppError;

/// Postgres-backed document store: one table, JSONB bodies.
#[derive(Clone)]
pub struct PgDocumentStore {
    db_pool: PgPool,
}

#[derive(sqlx::FromRow)]
struct DocumentRow {
    id: Uuid,
    body: Value,
}

impl DocumentRow {
    fn into_document(self) -> Result<StoredDocument, AppError> {
        match self.body {
            Value::Object(body) => Ok(StoredDocument { id: self.id, body }),
            other => Err(AppError::Database(format!(
                "Document {} has a non-object body: {}",
                self.id, other
            ))),
        }
    }
}

impl PgDocumentStore {
    pub fn new(db_pool: PgPool) -> Self {
        Self { db_pool }
    }

    /// Creates the documents table if it is missing.
    pub async fn ensure_schema(&self) -> Result<(), AppError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS documents (
                collection TEXT NOT NULL,
                id UUID NOT NULL,
                body JSONB NOT NULL,
                created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
                updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
                PRIMARY KEY (collection, id)
            )
            "#,
        )
        .execute(&self.db_pool)
        .await
        .map_err(|e| AppError::Database(format!("Failed to create documents table: {}", e)))?;

        log::info!("Document store schema is ready");
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for PgDocumentStore {
    async fn insert(&self, collection: &str, id: Uuid, body: Map<String, Value>) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO documents (collection, id, body, created_at, updated_at)
            VALUES ($1, $2, $3, now(), now())
            "#,
        )
        .bind(collection)
        .bind(id)
        .bind(Value::Object(body))
        .execute(&self.db_pool)
        .await
        .map_err(|e| AppError::Database(format!("Failed to insert into {}: {}", collection, e)))?;

        Ok(())
    }

    async fn find_all(&self, collection: &str) -> Result<Vec<StoredDocument>, AppError> {
        let rows = sqlx::query_as::<_, DocumentRow>(
            r#"
            SELECT id, body
            FROM documents
            WHERE collection = $1
            ORDER BY created_at, id
            "#,
        )
        .bind(collection)
        .fetch_all(&self.db_pool)
        .await
        .map_err(|e| AppError::Database(format!("Failed to list {}: {}", collection, e)))?;

        rows.into_iter().map(DocumentRow::into_document).collect()
    }

    async fn find_by_id(&self, collection: &str, id: Uuid) -> Result<Option<StoredDocument>, AppError> {
        let row = sqlx::query_as::<_, DocumentRow>(
            r#"
            SELECT id, body
            FROM documents
            WHERE collection = $1 AND id = $2
            "#,
        )
        .bind(collection)
        .bind(id)
        .fetch_optional(&self.db_pool)
        .await
        .map_err(|e| AppError::Database(format!("Failed to fetch from {}: {}", collection, e)))?;

        row.map(DocumentRow::into_document).transpose()
    }

    async fn find_by_field(
        &self,
        collection: &str,
        field: &str,
        value: &Value,
    ) -> Result<Vec<StoredDocument>, AppError> {
        let rows = sqlx::query_as::<_, DocumentRow>(
            r#"
            SELECT id, body
            FROM documents
            WHERE collection = $1 AND body -> $2 = $3
            ORDER BY created_at, id
            "#,
        )
        .bind(collection)
        .bind(field)
        .bind(value)
        .fetch_all(&self.db_pool)
        .await
        .map_err(|e| AppError::Database(format!("Failed to query {}: {}", collection, e)))?;

        rows.into_iter().map(DocumentRow::into_document).collect()
    }

    async fn replace(&self, collection: &str, id: Uuid, body: Map<String, Value>) -> Result<bool, AppError> {
        let result = sqlx::query(
            r#"
            UPDATE documents
            SET body = $3,
                updated_at = now()
            WHERE collection = $1 AND id = $2
            "#,
        )
        .bind(collection)
        .bind(id)
        .bind(Value::Object(body))
        .execute(&self.db_pool)
        .await
        .map_err(|e| AppError::Database(format!("Failed to update {}: {}", collection, e)))?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, collection: &str, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query(
            r#"
            DELETE FROM documents
            WHERE collection = $1 AND id = $2
            "#,
        )
        .bind(collection)
        .bind(id)
        .execute(&self.db_pool)
        .await
        .map_err(|e| AppError::Database(format!("Failed to delete from {}: {}", collection, e)))?;

        Ok(result.rows_affected() > 0)
    }
}
