use axum::{
    extract::{Path, Query},
    http::StatusCode,
    Json,
};
use contracts::domain::a004_visit::aggregate::{Visit, VisitDto, VisitListQuery};
use contracts::domain::a006_material_sale::aggregate::MaterialSale;
use serde_json::json;

use crate::domain::{a004_visit, a006_material_sale};
use crate::shared::error::{from_service, parse_uuid, ApiError, ApiResult};

/// GET /api/visit?date_from=2025-03-01&date_to=2025-03-31&operator_id=...&status=completed
pub async fn list(Query(query): Query<VisitListQuery>) -> ApiResult<Json<Vec<Visit>>> {
    let visits = a004_visit::service::list(&query).await?;
    tracing::debug!("Visit list: {} rows", visits.len());
    Ok(Json(visits))
}

/// GET /api/visit/:id
pub async fn get_by_id(Path(id): Path<String>) -> ApiResult<Json<Visit>> {
    let uuid = parse_uuid(&id)?;
    a004_visit::service::get_by_id(uuid)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Visit"))
}

/// GET /api/visit/:id/material_sales
pub async fn list_material_sales(Path(id): Path<String>) -> ApiResult<Json<Vec<MaterialSale>>> {
    let uuid = parse_uuid(&id)?;
    Ok(Json(a006_material_sale::service::list_by_visit(uuid).await?))
}

/// POST /api/visit
pub async fn upsert(Json(dto): Json<VisitDto>) -> ApiResult<Json<serde_json::Value>> {
    let id = match dto.id.clone() {
        Some(id) => {
            a004_visit::service::update(dto).await.map_err(from_service)?;
            id
        }
        None => a004_visit::service::create(dto)
            .await
            .map_err(from_service)?
            .to_string(),
    };
    Ok(Json(json!({ "id": id })))
}

/// POST /api/visit/:id/complete
pub async fn complete(Path(id): Path<String>) -> ApiResult<Json<Visit>> {
    let uuid = parse_uuid(&id)?;
    let visit = a004_visit::service::complete(uuid)
        .await
        .map_err(from_service)?;
    Ok(Json(visit))
}

/// POST /api/visit/:id/cancel
pub async fn cancel(Path(id): Path<String>) -> ApiResult<Json<Visit>> {
    let uuid = parse_uuid(&id)?;
    let visit = a004_visit::service::cancel(uuid)
        .await
        .map_err(from_service)?;
    Ok(Json(visit))
}

/// DELETE /api/visit/:id
pub async fn delete(Path(id): Path<String>) -> ApiResult<StatusCode> {
    let uuid = parse_uuid(&id)?;
    if a004_visit::service::delete(uuid).await? {
        Ok(StatusCode::OK)
    } else {
        Err(ApiError::not_found("Visit"))
    }
}
