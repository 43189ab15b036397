use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::db::document_store::DocumentStore;
use crate::db::repositories::DocumentRepository;
use crate::error::{AppError, AppResult};
use crate::models::document::{require_non_empty, Document};
use crate::models::modality::Modality;
use crate::services::policy::Resource;

pub const MAX_LESSONS_PER_WEEK: u8 = 7;

/// A purchasable offering for one modality.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Plan {
    pub name: String,
    pub active: bool,
    /// Id of the referenced modality.
    pub modality: Uuid,
    pub number_lessons_week: u8,
    pub month_duration: u32,
    pub month_price: f64,
}

#[async_trait]
impl Document for Plan {
    const COLLECTION: &'static str = "plans";
    const RESOURCE: Resource = Resource::Plan;
    const SINGULAR: &'static str = "plan";
    const PLURAL: &'static str = "plans";
    const LABEL: &'static str = "Plan";

    fn validate(&self) -> AppResult<()> {
        require_non_empty("name", &self.name)?;

        if !(1..=MAX_LESSONS_PER_WEEK).contains(&self.number_lessons_week) {
            return Err(AppError::Validation(format!(
                "Field 'numberLessonsWeek' must be between 1 and {}",
                MAX_LESSONS_PER_WEEK
            )));
        }
        if self.month_duration < 1 {
            return Err(AppError::Validation(
                "Field 'monthDuration' must be at least 1".to_string(),
            ));
        }
        if !self.month_price.is_finite() || self.month_price < 0.0 {
            return Err(AppError::Validation(
                "Field 'monthPrice' must be a non-negative number".to_string(),
            ));
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
