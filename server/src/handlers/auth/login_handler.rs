use actix_web::{web, HttpResponse};
use log::info;
use serde::Deserialize;

use crate::error::AppError;
use crate::models::{AppState, SessionResponse};
use crate::services::auth::{session_cookie, CredentialService};

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Verifies credentials and opens a cookie session.
pub async fn login(
    state: web::Data<AppState>,
    payload: web::Json<LoginRequest>,
) -> Result<HttpResponse, AppError> {
    let LoginRequest { email, password } = payload.into_inner();

    let identity = CredentialService::new(state.store.clone())
        .authenticate(&email, &password)
        .await?;
    let issued = state.tokens.issue(&identity)?;

    info!(
        "Session opened for account {} ({}) until {}",
        identity.user_id, identity.role, issued.expires_at
    );

    Ok(HttpResponse::Ok()
        .cookie(session_cookie(issued.token, state.tokens.lifetime(), state.secure_cookies()))
        .json(SessionResponse::from(&identity)))
}
