use serde_json::Value;
use std::sync::Arc;
use uuid::Uuid;

use crate::db::document_store::DocumentStore;
use crate::error::{AppError, AppResult};
use crate::models::account::ACCOUNT_COLLECTIONS;
use crate::models::authenticated_user::Role;

/// What the credential check needs to know about an account.
#[derive(Debug, Clone)]
pub struct AccountCredentials {
    pub id: Uuid,
    pub role: Role,
    pub password_hash: String,
}

/// Email lookups spanning the admin, manager and customer collections.
pub struct AccountRepository {
    store: Arc<dyn DocumentStore>,
}

impl AccountRepository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    // Get account by normalized email, searching admins first
    pub async fn find_by_email(&self, email: &str) -> AppResult<Option<AccountCredentials>> {
        let needle = Value::String(email.to_string());

        for (collection, role) in ACCOUNT_COLLECTIONS {
            let matches = self.store.find_by_field(collection, "email", &needle).await?;
            if let Some(account) = matches.into_iter().next() {
                let password_hash = account
                    .body
                    .get("password")
                    .and_then(Value::as_str)
                    .ok_or_else(|| {
                        AppError::Database(format!("Account {} in {} has no password hash", account.id, collection))
                    })?
                    .to_string();

                return Ok(Some(AccountCredentials {
                    id: account.id,
                    role,
                    password_hash,
                }));
            }
        }

        Ok(None)
    }

    /// Whether any account other than `except` already uses this email.
    pub async fn email_in_use(&self, email: &str, except: Option<Uuid>) -> AppResult<bool> {
        let needle = Value::String(email.to_string());

        for (collection, _) in ACCOUNT_COLLECTIONS {
            let matches = self.store.find_by_field(collection, "email", &needle).await?;
            if matches.iter().any(|account| Some(account.id) != except) {
                return Ok(true);
            }
        }

        Ok(false)
    }
}
