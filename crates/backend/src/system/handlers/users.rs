use axum::{
    extract::{Json, Path},
    http::StatusCode,
};
use contracts::system::users::{ChangePasswordDto, CreateUserDto, UpdateUserDto, User};
use serde_json::json;

use crate::shared::error::{from_service, ApiError, ApiResult};
use crate::system::auth::extractor::CurrentUser;
use crate::system::users::service;

/// GET /api/system/users (admin)
pub async fn list(CurrentUser(_claims): CurrentUser) -> ApiResult<Json<Vec<User>>> {
    Ok(Json(service::list_all().await?))
}

/// GET /api/system/users/:id (admin)
pub async fn get_by_id(
    CurrentUser(_claims): CurrentUser,
    Path(id): Path<String>,
) -> ApiResult<Json<User>> {
    service::get_by_id(&id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("User"))
}

/// POST /api/system/users (admin)
pub async fn create(
    CurrentUser(claims): CurrentUser,
    Json(dto): Json<CreateUserDto>,
) -> ApiResult<Json<serde_json::Value>> {
    let user_id = service::create(dto, Some(claims.sub))
        .await
        .map_err(from_service)?;

    Ok(Json(json!({ "id": user_id })))
}

/// PUT /api/system/users/:id (admin)
pub async fn update(
    CurrentUser(_claims): CurrentUser,
    Path(id): Path<String>,
    Json(mut dto): Json<UpdateUserDto>,
) -> ApiResult<StatusCode> {
    dto.id = id;
    service::update(dto).await.map_err(from_service)?;
    Ok(StatusCode::OK)
}

/// DELETE /api/system/users/:id (admin)
pub async fn delete(
    CurrentUser(_claims): CurrentUser,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    if service::delete(&id).await.map_err(from_service)? {
        Ok(StatusCode::OK)
    } else {
        Err(ApiError::not_found("User"))
    }
}

/// POST /api/system/users/:id/change-password
pub async fn change_password(
    CurrentUser(claims): CurrentUser,
    Path(id): Path<String>,
    Json(mut dto): Json<ChangePasswordDto>,
) -> ApiResult<StatusCode> {
    dto.user_id = id;
    service::change_password(dto, &claims.sub)
        .await
        .map_err(from_service)?;
    Ok(StatusCode::OK)
}
