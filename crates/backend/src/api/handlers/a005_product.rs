use axum::{extract::Path, http::StatusCode, Json};
use contracts::domain::a005_product::aggregate::{Product, ProductDto};
use serde_json::json;

use crate::domain::a005_product;
use crate::shared::error::{from_service, parse_uuid, ApiError, ApiResult};

/// GET /api/product
pub async fn list_all() -> ApiResult<Json<Vec<Product>>> {
    Ok(Json(a005_product::service::list_all().await?))
}

/// GET /api/product/:id
pub async fn get_by_id(Path(id): Path<String>) -> ApiResult<Json<Product>> {
    let uuid = parse_uuid(&id)?;
    a005_product::service::get_by_id(uuid)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Product"))
}

/// POST /api/product
pub async fn upsert(Json(dto): Json<ProductDto>) -> ApiResult<Json<serde_json::Value>> {
    let id = match dto.id.clone() {
        Some(id) => {
            a005_product::service::update(dto).await.map_err(from_service)?;
            id
        }
        None => a005_product::service::create(dto)
            .await
            .map_err(from_service)?
            .to_string(),
    };
    Ok(Json(json!({ "id": id })))
}

/// DELETE /api/product/:id
pub async fn delete(Path(id): Path<String>) -> ApiResult<StatusCode> {
    let uuid = parse_uuid(&id)?;
    if a005_product::service::delete(uuid).await? {
        Ok(StatusCode::OK)
    } else {
        Err(ApiError::not_found("Product"))
    }
}
