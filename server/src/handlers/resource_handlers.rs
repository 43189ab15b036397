//! Generic controllers shared by every document-backed resource.
//!
//! Each handler asks the authorization policy first, then delegates to the
//! [`ResourceService`] for the document type it is instantiated with.

use actix_web::{web, HttpResponse};
use serde_json::{json, Value};

use crate::error::AppError;
use crate::models::document::{envelope, parse_id, Document};
use crate::models::{AppState, AuthenticatedUser};
use crate::services::policy::Operation;
use crate::services::resource_service::ResourceService;

type Identity = Option<web::ReqData<AuthenticatedUser>>;

pub async fn create_record<T: Document>(
    state: web::Data<AppState>,
    user: Identity,
    payload: web::Json<Value>,
) -> Result<HttpResponse, AppError> {
    state.policy.authorize(user.as_deref(), T::RESOURCE, Operation::Create)?;

    let record = ResourceService::<T>::new(state.store.clone())
        .create(payload.into_inner())
        .await?;

    Ok(HttpResponse::Created().json(envelope(T::SINGULAR, record.to_response()?)))
}

pub async fn list_records<T: Document>(
    state: web::Data<AppState>,
    user: Identity,
) -> Result<HttpResponse, AppError> {
    state.policy.authorize(user.as_deref(), T::RESOURCE, Operation::Read)?;

    let records = ResourceService::<T>::new(state.store.clone()).list().await?;
    let body = records
        .iter()
        .map(|record| record.to_response())
        .collect::<Result<Vec<_>, _>>()?;

    Ok(HttpResponse::Ok().json(envelope(T::PLURAL, Value::Array(body))))
}

pub async fn get_record<T: Document>(
    state: web::Data<AppState>,
    user: Identity,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    state.policy.authorize(user.as_deref(), T::RESOURCE, Operation::Read)?;

    let id = parse_id::<T>(&path)?;
    let record = ResourceService::<T>::new(state.store.clone()).get(id).await?;

    Ok(HttpResponse::Ok().json(envelope(T::SINGULAR, record.to_response()?)))
}

pub async fn update_record<T: Document>(
    state: web::Data<AppState>,
    user: Identity,
    path: web::Path<String>,
    payload: web::Json<Value>,
) -> Result<HttpResponse, AppError> {
    state.policy.authorize(user.as_deref(), T::RESOURCE, Operation::Update)?;

    let id = parse_id::<T>(&path)?;
    let record = ResourceService::<T>::new(state.store.clone())
        .update(id, payload.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(envelope(T::SINGULAR, record.to_response()?)))
}

pub async fn delete_record<T: Document>(
    state: web::Data<AppState>,
    user: Identity,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    state.policy.authorize(user.as_deref(), T::RESOURCE, Operation::Delete)?;

    let id = parse_id::<T>(&path)?;
    ResourceService::<T>::new(state.store.clone()).delete(id).await?;

    Ok(HttpResponse::Ok().json(json!({ "deleted": id })))
}
