use std::sync::Arc;

use crate::config::AppSettings;
use crate::db::document_store::DocumentStore;
use crate::services::auth::TokenService;
use crate::services::policy::{AuthorizationPolicy, RolePolicy};

/// Application state shared across request handlers
#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<AppSettings>,
    pub store: Arc<dyn DocumentStore>,
    pub policy: Arc<dyn AuthorizationPolicy>,
    pub tokens: TokenService,
}

impl AppState {
    pub fn new(settings: AppSettings, store: Arc<dyn DocumentStore>, tokens: TokenService) -> Self {
        Self {
            settings: Arc::new(settings),
            store,
            policy: Arc::new(RolePolicy),
            tokens,
        }
    }

    /// Cookies carry the `Secure` flag outside local development.
    pub fn secure_cookies(&self) -> bool {
        self.settings.auth.secure_cookies
    }
}
