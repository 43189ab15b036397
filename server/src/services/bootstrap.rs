use log::{error, info, warn};
use serde_json::json;
use std::sync::Arc;

use crate::config::settings::SeedAdmin;
use crate::db::document_store::DocumentStore;
use crate::db::repositories::AccountRepository;
use crate::error::AppResult;
use crate::models::account::{normalize_email, Admin};
use crate::services::resource_service::ResourceService;

/// Outcome of the startup admin seeding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedOutcome {
    Created,
    AlreadyPresent,
    NotConfigured,
}

/// Creates the configured admin account unless its email is already taken.
pub async fn seed_admin(store: Arc<dyn DocumentStore>, seed: Option<&SeedAdmin>) -> AppResult<SeedOutcome> {
    let Some(seed) = seed else {
        return Ok(SeedOutcome::NotConfigured);
    };

    let email = normalize_email(&seed.email);
    if AccountRepository::new(store.clone()).email_in_use(&email, None).await? {
        info!("Seed admin {} already exists, skipping", email);
        return Ok(SeedOutcome::AlreadyPresent);
    }

    let record = ResourceService::<Admin>::new(store)
        .create(json!({
            "name": seed.name,
            "email": email,
            "password": seed.password,
        }))
        .await?;

    info!("Seed admin {} created with id {}", record.document.email, record.id);
    Ok(SeedOutcome::Created)
}

/// Startup wrapper: seeding problems are logged and never stop the server.
pub async fn run_bootstrap(store: Arc<dyn DocumentStore>, seed: Option<&SeedAdmin>) {
    match seed_admin(store, seed).await {
        Ok(SeedOutcome::NotConfigured) => {
            warn!("No seed admin configured (SEED_ADMIN_NAME, SEED_ADMIN_EMAIL, SEED_ADMIN_PASSWORD)");
        }
        Ok(_) => {}
        Err(e) => error!("Failed to seed admin account: {}", e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryDocumentStore;
    use crate::error::AppError;

    fn seed(password: &str) -> SeedAdmin {
        SeedAdmin {
            name: "Root".to_string(),
            email: "Root@Gym.Example".to_string(),
            password: password.to_string(),
        }
    }

    #[tokio::test]
    async fn test_seed_runs_once() {
        let store: Arc<dyn DocumentStore> = Arc::new(MemoryDocumentStore::new());
        let seed = seed("rootpass");

        assert_eq!(seed_admin(store.clone(), Some(&seed)).await.unwrap(), SeedOutcome::Created);
        assert_eq!(seed_admin(store.clone(), Some(&seed)).await.unwrap(), SeedOutcome::AlreadyPresent);
        assert_eq!(seed_admin(store, None).await.unwrap(), SeedOutcome::NotConfigured);
    }

    #[tokio::test]
    async fn test_invalid_seed_reports_validation_error() {
        let store: Arc<dyn DocumentStore> = Arc::new(MemoryDocumentStore::new());
        let result = seed_admin(store.clone(), Some(&seed("123"))).await;
        assert!(matches!(result, Err(AppError::Validation(_))));

        // The wrapper swallows the failure
        run_bootstrap(store, Some(&seed("123"))).await;
    }
}
