use axum::{
    extract::{Path, Query},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use contracts::domain::a002_branch::aggregate::{Branch, BranchDto};
use serde_json::json;

use crate::domain::a002_branch;
use crate::shared::error::{from_service, parse_uuid, ApiError, ApiResult};

#[derive(Debug, Deserialize)]
pub struct BranchListParams {
    pub customer_id: Option<String>,
}

/// GET /api/branch?customer_id=...
pub async fn list_all(Query(params): Query<BranchListParams>) -> ApiResult<Json<Vec<Branch>>> {
    let items = match params.customer_id.as_deref().filter(|s| !s.is_empty()) {
        Some(customer_id) => a002_branch::service::list_by_customer(parse_uuid(customer_id)?).await?,
        None => a002_branch::service::list_all().await?,
    };
    Ok(Json(items))
}

/// GET /api/branch/:id
pub async fn get_by_id(Path(id): Path<String>) -> ApiResult<Json<Branch>> {
    let uuid = parse_uuid(&id)?;
    a002_branch::service::get_by_id(uuid)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Branch"))
}

/// POST /api/branch
pub async fn upsert(Json(dto): Json<BranchDto>) -> ApiResult<Json<serde_json::Value>> {
    let id = match dto.id.clone() {
        Some(id) => {
            a002_branch::service::update(dto).await.map_err(from_service)?;
            id
        }
        None => a002_branch::service::create(dto)
            .await
            .map_err(from_service)?
            .to_string(),
    };
    Ok(Json(json!({ "id": id })))
}

/// DELETE /api/branch/:id
pub async fn delete(Path(id): Path<String>) -> ApiResult<StatusCode> {
    let uuid = parse_uuid(&id)?;
    if a002_branch::service::delete(uuid).await? {
        Ok(StatusCode::OK)
    } else {
        Err(ApiError::not_found("Branch"))
    }
}
