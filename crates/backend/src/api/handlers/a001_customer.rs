use axum::{extract::Path, http::StatusCode, Json};
use contracts::domain::a001_customer::aggregate::{Customer, CustomerDto};
use contracts::domain::a002_branch::aggregate::Branch;
use serde_json::json;

use crate::domain::{a001_customer, a002_branch};
use crate::shared::error::{from_service, parse_uuid, ApiError, ApiResult};

/// GET /api/customer
pub async fn list_all() -> ApiResult<Json<Vec<Customer>>> {
    Ok(Json(a001_customer::service::list_all().await?))
}

/// GET /api/customer/:id
pub async fn get_by_id(Path(id): Path<String>) -> ApiResult<Json<Customer>> {
    let uuid = parse_uuid(&id)?;
    a001_customer::service::get_by_id(uuid)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Customer"))
}

/// GET /api/customer/:id/branches
pub async fn list_branches(Path(id): Path<String>) -> ApiResult<Json<Vec<Branch>>> {
    let uuid = parse_uuid(&id)?;
    Ok(Json(a002_branch::service::list_by_customer(uuid).await?))
}

/// POST /api/customer
pub async fn upsert(Json(dto): Json<CustomerDto>) -> ApiResult<Json<serde_json::Value>> {
    let id = match dto.id.clone() {
        Some(id) => {
            a001_customer::service::update(dto).await.map_err(from_service)?;
            id
        }
        None => a001_customer::service::create(dto)
            .await
            .map_err(from_service)?
            .to_string(),
    };
    Ok(Json(json!({ "id": id })))
}

/// DELETE /api/customer/:id
pub async fn delete(Path(id): Path<String>) -> ApiResult<StatusCode> {
    let uuid = parse_uuid(&id)?;
    if a001_customer::service::delete(uuid).await? {
        Ok(StatusCode::OK)
    } else {
        Err(ApiError::not_found("Customer"))
    }
}
