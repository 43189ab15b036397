pub mod auth;
pub mod health;
pub mod membership_handlers;
pub mod resource_handlers;

use actix_web::HttpRequest;

use crate::error::AppError;

/// Fallback for routes that match nothing.
pub async fn not_found(req: HttpRequest) -> Result<actix_web::HttpResponse, AppError> {
    Err(AppError::NotFound(format!("Route {} {} not found", req.method(), req.path())))
}
