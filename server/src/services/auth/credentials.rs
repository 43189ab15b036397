use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use log::{debug, info};
use rand::RngCore;
use std::sync::Arc;

use crate::db::document_store::DocumentStore;
use crate::db::repositories::AccountRepository;
use crate::error::AppError;
use crate::models::account::normalize_email;
use crate::models::authenticated_user::AuthenticatedUser;

/// Hashes a plaintext password into an argon2 PHC string.
pub fn hash_password(password: &str) -> Result<String, AppError> {
    let mut salt_bytes = [0u8; 16];
    rand::rng().fill_bytes(&mut salt_bytes);
    let salt = SaltString::encode_b64(&salt_bytes)
        .map_err(|e| AppError::Internal(format!("Failed to encode password salt: {}", e)))?;

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))
}

/// Checks a plaintext password against a stored PHC string.
pub fn verify_password(hash: &str, password: &str) -> bool {
    match PasswordHash::new(hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => false,
    }
}

/// Matches login credentials against the stored accounts.
pub struct CredentialService {
    accounts: AccountRepository,
}

impl CredentialService {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            accounts: AccountRepository::new(store),
        }
    }

    /// Unknown email and wrong password are indistinguishable to the caller.
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<AuthenticatedUser, AppError> {
        let email = normalize_email(email);
        let invalid = || AppError::Auth("Invalid credentials".to_string());

        let Some(account) = self.accounts.find_by_email(&email).await? else {
            debug!("Login attempt for unknown email");
            return Err(invalid());
        };

        if !verify_password(&account.password_hash, password) {
            debug!("Login attempt with wrong password for account {}", account.id);
            return Err(invalid());
        }

        info!("Account {} authenticated as {}", account.id, account.role);
        Ok(AuthenticatedUser {
            user_id: account.id,
            role: account.role,
        })
    }
}
