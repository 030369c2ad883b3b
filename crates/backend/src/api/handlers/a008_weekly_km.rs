use axum::{
    extract::{Path, Query},
    http::StatusCode,
    Json,
};
use contracts::domain::a008_weekly_km::aggregate::{WeeklyKm, WeeklyKmDto};
use serde::Deserialize;
use serde_json::json;

use crate::domain::a008_weekly_km;
use crate::shared::error::{from_service, parse_uuid, ApiError, ApiResult};

#[derive(Debug, Deserialize)]
pub struct WeeklyKmListParams {
    pub operator_id: Option<String>,
}

/// GET /api/weekly_km?operator_id=...
pub async fn list_all(Query(params): Query<WeeklyKmListParams>) -> ApiResult<Json<Vec<WeeklyKm>>> {
    let operator_id = match params.operator_id.as_deref().filter(|s| !s.is_empty()) {
        Some(id) => Some(parse_uuid(id)?),
        None => None,
    };
    Ok(Json(a008_weekly_km::service::list(operator_id).await?))
}

/// GET /api/weekly_km/:id
pub async fn get_by_id(Path(id): Path<String>) -> ApiResult<Json<WeeklyKm>> {
    let uuid = parse_uuid(&id)?;
    a008_weekly_km::service::get_by_id(uuid)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Weekly km entry"))
}

/// POST /api/weekly_km
pub async fn upsert(Json(dto): Json<WeeklyKmDto>) -> ApiResult<Json<serde_json::Value>> {
    let id = match dto.id.clone() {
        Some(id) => {
            a008_weekly_km::service::update(dto).await.map_err(from_service)?;
            id
        }
        None => a008_weekly_km::service::create(dto)
            .await
            .map_err(from_service)?
            .to_string(),
    };
    Ok(Json(json!({ "id": id })))
}

/// DELETE /api/weekly_km/:id
pub async fn delete(Path(id): Path<String>) -> ApiResult<StatusCode> {
    let uuid = parse_uuid(&id)?;
    if a008_weekly_km::service::delete(uuid).await? {
        Ok(StatusCode::OK)
    } else {
        Err(ApiError::not_found("Weekly km entry"))
    }
}
