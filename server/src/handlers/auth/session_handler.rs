use actix_web::{web, HttpResponse};

use crate::error::AppError;
use crate::models::{AppState, AuthenticatedUser, SessionResponse};
use crate::services::policy::{Operation, Resource};

/// Returns the identity behind the current session cookie.
pub async fn verify_session(
    state: web::Data<AppState>,
    user: Option<web::ReqData<AuthenticatedUser>>,
) -> Result<HttpResponse, AppError> {
    state.policy.authorize(user.as_deref(), Resource::Session, Operation::Read)?;

    let identity = user.ok_or_else(|| AppError::Auth("Login is required".to_string()))?;
    Ok(HttpResponse::Ok().json(SessionResponse::from(&*identity)))
}
