use actix_web::{web, HttpResponse};
use log::info;
use serde_json::json;

use crate::error::AppError;
use crate::models::{AppState, AuthenticatedUser};
use crate::services::auth::removal_cookie;

/// Clears the session cookie. Tokens are stateless, so nothing is revoked
/// server-side: a copied token keeps working until it expires.
pub async fn logout(
    state: web::Data<AppState>,
    user: Option<web::ReqData<AuthenticatedUser>>,
) -> Result<HttpResponse, AppError> {
    match user.as_deref() {
        Some(identity) => info!("Account {} logged out", identity.user_id),
        None => info!("Logout without an active session"),
    }

    Ok(HttpResponse::Ok()
        .cookie(removal_cookie(state.secure_cookies()))
        .json(json!({
            "message": "Logged out successfully"
        })))
}
