use actix_web::{web, HttpResponse};
use serde_json::Value;

use crate::error::AppError;
use crate::models::document::{envelope, into_fields, parse_id, Document};
use crate::models::{AppState, AuthenticatedUser, Customer, Membership};
use crate::services::policy::Operation;
use crate::services::resource_service::ResourceService;

/// Memberships of one customer, in creation order.
pub async fn list_customer_memberships(
    state: web::Data<AppState>,
    user: Option<web::ReqData<AuthenticatedUser>>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    state.policy.authorize(user.as_deref(), Membership::RESOURCE, Operation::Read)?;

    let customer_id = parse_id::<Customer>(&path)?;
    ResourceService::<Customer>::new(state.store.clone()).get(customer_id).await?;

    let memberships = ResourceService::<Membership>::new(state.store.clone())
        .find_by("customer", &Value::String(customer_id.to_string()))
        .await?;
    let body = memberships
        .iter()
        .map(|record| record.to_response())
        .collect::<Result<Vec<_>, _>>()?;

    Ok(HttpResponse::Ok().json(envelope(Membership::PLURAL, Value::Array(body))))
}

/// Creates a membership for the customer named in the path. A `customer`
/// field in the body is overridden by the path id.
pub async fn create_customer_membership(
    state: web::Data<AppState>,
    user: Option<web::ReqData<AuthenticatedUser>>,
    path: web::Path<String>,
    payload: web::Json<Value>,
) -> Result<HttpResponse, AppError> {
    state.policy.authorize(user.as_deref(), Membership::RESOURCE, Operation::Create)?;

    let customer_id = parse_id::<Customer>(&path)?;
    let mut fields = into_fields(payload.into_inner())?;
    fields.insert("customer".to_string(), Value::String(customer_id.to_string()));

    let record = ResourceService::<Membership>::new(state.store.clone())
        .create(Value::Object(fields))
        .await?;

    Ok(HttpResponse::Created().json(envelope(Membership::SINGULAR, record.to_response()?)))
}
