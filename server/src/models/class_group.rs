use async_trait::async_trait;
use chrono::{NaiveTime, Weekday};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::db::document_store::DocumentStore;
use crate::db::repositories::DocumentRepository;
use crate::error::{AppError, AppResult};
use crate::models::document::{require_non_empty, Document};
use crate::models::modality::Modality;
use crate::services::policy::Resource;

/// A recurring weekly class for one modality.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassGroup {
    pub name: String,
    pub modality: Uuid,
    pub weekdays: Vec<Weekday>,
    pub start_time: NaiveTime,
    pub capacity: u32,
    pub active: bool,
}

#[async_trait]
impl Document for ClassGroup {
    const COLLECTION: &'static str = "classGroups";
    const RESOURCE: Resource = Resource::ClassGroup;
    const SINGULAR: &'static str = "classGroup";
    const PLURAL: &'static str = "classGroups";
    const LABEL: &'static str = "Class group";

    fn validate(&self) -> AppResult<()> {
        require_non_empty("name", &self.name)?;
        if self.weekdays.is_empty() {
            return Err(AppError::Validation(
                "Field 'weekdays' must list at least one day".to_string(),
            ));
        }
        if self.capacity < 1 {
            return Err(AppError::Validation("Field 'capacity' must be at least 1".to_string()));
        }
        Ok(())
    }

    async fn check_constraints(&self, _own_id: Option<Uuid>, store: &Arc<dyn DocumentStore>) -> AppResult<()> {
        if !DocumentRepository::<Modality>::new(store.clone()).exists(self.modality).await? {
            return Err(AppError::NotFound(format!("{} not found", Modality::LABEL)));
        }
        Ok(())
    }
}
