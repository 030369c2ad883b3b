use axum::{extract::Path, http::StatusCode, Json};
use contracts::domain::a003_operator::aggregate::{Operator, OperatorDto};
use serde_json::json;

use crate::domain::a003_operator;
use crate::shared::error::{from_service, parse_uuid, ApiError, ApiResult};

/// GET /api/operator
pub async fn list_all() -> ApiResult<Json<Vec<Operator>>> {
    Ok(Json(a003_operator::service::list_all().await?))
}

/// GET /api/operator/:id
pub async fn get_by_id(Path(id): Path<String>) -> ApiResult<Json<Operator>> {
    let uuid = parse_uuid(&id)?;
    a003_operator::service::get_by_id(uuid)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Operator"))
}

/// POST /api/operator
pub async fn upsert(Json(dto): Json<OperatorDto>) -> ApiResult<Json<serde_json::Value>> {
    let id = match dto.id.clone() {
        Some(id) => {
            a003_operator::service::update(dto).await.map_err(from_service)?;
            id
        }
        None => a003_operator::service::create(dto)
            .await
            .map_err(from_service)?
            .to_string(),
    };
    Ok(Json(json!({ "id": id })))
}

/// DELETE /api/operator/:id
pub async fn delete(Path(id): Path<String>) -> ApiResult<StatusCode> {
    let uuid = parse_uuid(&id)?;
    if a003_operator::service::delete(uuid).await? {
        Ok(StatusCode::OK)
    } else {
        Err(ApiError::not_found("Operator"))
    }
}
