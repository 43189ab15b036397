use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::db::document_store::DocumentStore;
use crate::db::repositories::DocumentRepository;
use crate::error::{AppError, AppResult};
use crate::models::account::Customer;
use crate::models::document::Document;
use crate::models::plan::Plan;
use crate::services::policy::Resource;

/// Links a customer to a plan from a start date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Membership {
    pub customer: Uuid,
    pub plan: Uuid,
    pub start_date: NaiveDate,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

#[async_trait]
impl Document for Membership {
    const COLLECTION: &'static str = "memberships";
    const RESOURCE: Resource = Resource::Membership;
    const SINGULAR: &'static str = "membership";
    const PLURAL: &'static str = "memberships";
    const LABEL: &'static str = "Membership";

    async fn check_constraints(&self, _own_id: Option<Uuid>, store: &Arc<dyn DocumentStore>) -> AppResult<()> {
        if !DocumentRepository::<Customer>::new(store.clone()).exists(self.customer).await? {
            return Err(AppError::NotFound(format!("{} not found", Customer::LABEL)));
        }
        if !DocumentRepository::<Plan>::new(store.clone()).exists(self.plan).await? {
            return Err(AppError::NotFound(format!("{} not found", Plan::LABEL)));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryDocumentStore;
    use serde_json::json;

    #[test]
    fn test_active_defaults_to_true() {
        let membership: Membership = serde_json::from_value(json!({
            "customer": Uuid::new_v4(),
            "plan": Uuid::new_v4(),
            "startDate": "2024-03-01"
        }))
        .unwrap();
        assert!(membership.active);
        assert_eq!(membership.start_date, NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
    }

    #[tokio::test]
    async fn test_missing_customer_is_reported_first() {
        let store: Arc<dyn DocumentStore> = Arc::new(MemoryDocumentStore::new());
        let membership = Membership {
            customer: Uuid::new_v4(),
            plan: Uuid::new_v4(),
            start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            active: true,
        };
        let result = membership.check_constraints(None, &store).await;
        assert!(matches!(result, Err(AppError::NotFound(msg)) if msg == "Customer not found"));
    }
}
