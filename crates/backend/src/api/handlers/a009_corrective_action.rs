use axum::{
    extract::{Path, Query},
    http::StatusCode,
    Json,
};
use contracts::domain::a009_corrective_action::aggregate::{
    CorrectiveAction, CorrectiveActionDto, SetCheckedRequest,
};
use serde::Deserialize;
use serde_json::json;

use crate::domain::a009_corrective_action;
use crate::shared::error::{from_service, parse_uuid, ApiError, ApiResult};

#[derive(Debug, Deserialize)]
pub struct CorrectiveActionListParams {
    pub customer_id: Option<String>,
}

/// GET /api/corrective_action?customer_id=...
pub async fn list_all(
    Query(params): Query<CorrectiveActionListParams>,
) -> ApiResult<Json<Vec<CorrectiveAction>>> {
    let customer_id = match params.customer_id.as_deref().filter(|s| !s.is_empty()) {
        Some(id) => Some(parse_uuid(id)?),
        None => None,
    };
    Ok(Json(a009_corrective_action::service::list(customer_id).await?))
}

/// GET /api/corrective_action/:id
pub async fn get_by_id(Path(id): Path<String>) -> ApiResult<Json<CorrectiveAction>> {
    let uuid = parse_uuid(&id)?;
    a009_corrective_action::service::get_by_id(uuid)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Corrective action"))
}

/// POST /api/corrective_action
pub async fn upsert(Json(dto): Json<CorrectiveActionDto>) -> ApiResult<Json<serde_json::Value>> {
    let id = match dto.id.clone() {
        Some(id) => {
            a009_corrective_action::service::update(dto)
                .await
                .map_err(from_service)?;
            id
        }
        None => a009_corrective_action::service::create(dto)
            .await
            .map_err(from_service)?
            .to_string(),
    };
    Ok(Json(json!({ "id": id })))
}

/// POST /api/corrective_action/:id/checked (admin)
pub async fn set_checked(
    Path(id): Path<String>,
    Json(request): Json<SetCheckedRequest>,
) -> ApiResult<Json<CorrectiveAction>> {
    let uuid = parse_uuid(&id)?;
    a009_corrective_action::service::set_checked(uuid, request.checked)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Corrective action"))
}

/// DELETE /api/corrective_action/:id
pub async fn delete(Path(id): Path<String>) -> ApiResult<StatusCode> {
    let uuid = parse_uuid(&id)?;
    if a009_corrective_action::service::delete(uuid).await? {
        Ok(StatusCode::OK)
    } else {
        Err(ApiError::not_found("Corrective action"))
    }
}
