use async_trait::async_trait;
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::Arc;
use uuid::Uuid;

use crate::db::document_store::DocumentStore;
use crate::db::repositories::AccountRepository;
use crate::error::{AppError, AppResult};
use crate::models::authenticated_user::Role;
use crate::models::document::{require_non_empty, Document};
use crate::services::auth::credentials::hash_password;
use crate::services::policy::Resource;

pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Collections that hold login-capable accounts, in credential lookup order.
pub const ACCOUNT_COLLECTIONS: [(&str, Role); 3] = [
    (Admin::COLLECTION, Role::Admin),
    (Manager::COLLECTION, Role::Manager),
    (Customer::COLLECTION, Role::Customer),
];

static EMAIL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email pattern is valid"));

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Admin {
    pub name: String,
    pub email: String,
    /// Argon2 PHC hash once stored.
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Manager {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<NaiveDate>,
}

/// Normalizes the email and replaces a plaintext password with its hash.
fn prepare_account_fields(fields: &mut Map<String, Value>) -> AppResult<()> {
    if let Some(Value::String(email)) = fields.get_mut("email") {
        *email = normalize_email(email);
    }

    if let Some(password) = fields.get_mut("password") {
        let plain = password
            .as_str()
            .ok_or_else(|| AppError::Validation("Field 'password' must be a string".to_string()))?;
        if plain.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(AppError::Validation(format!(
                "Password must be at least {} characters long",
                MIN_PASSWORD_LENGTH
            )));
        }
        *password = Value::String(hash_password(plain)?);
    }

    Ok(())
}

fn validate_account(name: &str, email: &str) -> AppResult<()> {
    require_non_empty("name", name)?;
    if !EMAIL_PATTERN.is_match(email) {
        return Err(AppError::Validation(format!("Invalid email address: {}", email)));
    }
    Ok(())
}

async fn ensure_email_available(
    email: &str,
    own_id: Option<Uuid>,
    store: &Arc<dyn DocumentStore>,
) -> AppResult<()> {
    if AccountRepository::new(store.clone()).email_in_use(email, own_id).await? {
        return Err(AppError::Validation("Email is already registered".to_string()));
    }
    Ok(())
}

macro_rules! account_document {
    ($ty:ty, $collection:literal, $resource:expr, $singular:literal, $plural:literal, $label:literal) => {
        #[async_trait]
        impl Document for $ty {
            const COLLECTION: &'static str = $collection;
            const RESOURCE: Resource = $resource;
            const SINGULAR: &'static str = $singular;
            const PLURAL: &'static str = $plural;
            const LABEL: &'static str = $label;

            fn prepare_fields(fields: &mut Map<String, Value>) -> AppResult<()> {
                prepare_account_fields(fields)
            }

            fn validate(&self) -> AppResult<()> {
                validate_account(&self.name, &self.email)
            }

            async fn check_constraints(&self, own_id: Option<Uuid>, store: &Arc<dyn DocumentStore>) -> AppResult<()> {
                ensure_email_available(&self.email, own_id, store).await
            }

            fn redact(fields: &mut Map<String, Value>) {
                fields.remove("password");
            }
        }
    };
}

account_document!(Admin, "admins", Resource::Admin, "admin", "admins", "Admin");
account_document!(Manager, "managers", Resource::Manager, "manager", "managers", "Manager");
account_document!(Customer, "customers", Resource::Customer, "customer", "customers", "Customer");
