use axum::{
    extract::{Path, Query},
    http::StatusCode,
    Json,
};
use contracts::domain::a006_material_sale::aggregate::{MaterialSale, MaterialSaleDto};
use serde::Deserialize;
use serde_json::json;

use crate::domain::a006_material_sale;
use crate::shared::error::{from_service, parse_uuid, ApiError, ApiResult};

#[derive(Debug, Deserialize)]
pub struct SaleListParams {
    pub visit_id: Option<String>,
}

/// GET /api/material_sale?visit_id=...
pub async fn list_all(Query(params): Query<SaleListParams>) -> ApiResult<Json<Vec<MaterialSale>>> {
    let items = match params.visit_id.as_deref().filter(|s| !s.is_empty()) {
        Some(visit_id) => a006_material_sale::service::list_by_visit(parse_uuid(visit_id)?).await?,
        None => a006_material_sale::service::list_all().await?,
    };
    Ok(Json(items))
}

/// GET /api/material_sale/:id
pub async fn get_by_id(Path(id): Path<String>) -> ApiResult<Json<MaterialSale>> {
    let uuid = parse_uuid(&id)?;
    a006_material_sale::service::get_by_id(uuid)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Material sale"))
}

/// POST /api/material_sale
pub async fn upsert(Json(dto): Json<MaterialSaleDto>) -> ApiResult<Json<serde_json::Value>> {
    let id = match dto.id.clone() {
        Some(id) => {
            a006_material_sale::service::update(dto)
                .await
                .map_err(from_service)?;
            id
        }
        None => a006_material_sale::service::create(dto)
            .await
            .map_err(from_service)?
            .to_string(),
    };
    Ok(Json(json!({ "id": id })))
}

/// DELETE /api/material_sale/:id
pub async fn delete(Path(id): Path<String>) -> ApiResult<StatusCode> {
    let uuid = parse_uuid(&id)?;
    if a006_material_sale::service::delete(uuid).await? {
        Ok(StatusCode::OK)
    } else {
        Err(ApiError::not_found("Material sale"))
    }
}
