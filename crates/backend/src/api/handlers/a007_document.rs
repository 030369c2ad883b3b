use axum::{
    extract::{Multipart, Path, Query},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use contracts::domain::a007_document::aggregate::{
    Document, DocumentDto, DocumentUploadMeta, DocumentVisibility, SignedUrlResponse,
};
use serde::Deserialize;
use serde_json::json;

use crate::domain::a007_document::service::{self, AccessDenied, DownloadCredentials};
use crate::shared::error::{from_service, parse_uuid, ApiError, ApiResult};
use crate::system::auth::extractor::MaybeUser;

/// GET /api/document
pub async fn list_all() -> ApiResult<Json<Vec<Document>>> {
    Ok(Json(service::list_all().await?))
}

/// GET /api/document/:id
pub async fn get_by_id(Path(id): Path<String>) -> ApiResult<Json<Document>> {
    let uuid = parse_uuid(&id)?;
    service::get_by_id(uuid)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Document"))
}

fn text_field(value: String) -> Option<String> {
    let value = value.trim().to_string();
    (!value.is_empty()).then_some(value)
}

/// POST /api/document/upload (multipart: `file` plus optional metadata fields)
pub async fn upload(mut multipart: Multipart) -> ApiResult<Json<Document>> {
    let mut meta = DocumentUploadMeta::default();
    let mut file: Option<(String, String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(format!("Invalid multipart body: {}", e)))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "file" => {
                let file_name = field.file_name().unwrap_or("upload.bin").to_string();
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::bad_request(format!("Failed to read file: {}", e)))?;
                file = Some((file_name, content_type, bytes.to_vec()));
            }
            other => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| ApiError::bad_request(format!("Failed to read {}: {}", other, e)))?;
                match other {
                    "description" => meta.description = text_field(value),
                    "comment" => meta.comment = text_field(value),
                    "customer_id" => meta.customer_id = text_field(value),
                    "access_password" => meta.access_password = text_field(value),
                    "entity_type" => {
                        let visibility = value
                            .parse::<DocumentVisibility>()
                            .map_err(|e| ApiError::bad_request(e.to_string()))?;
                        meta.entity_type = Some(visibility);
                    }
                    _ => tracing::debug!("Ignoring multipart field {}", other),
                }
            }
        }
    }

    let (file_name, content_type, bytes) =
        file.ok_or_else(|| ApiError::bad_request("Missing file field"))?;

    let document = service::upload(meta, &file_name, &content_type, bytes)
        .await
        .map_err(from_service)?;
    Ok(Json(document))
}

/// POST /api/document (metadata only)
pub async fn update(Json(dto): Json<DocumentDto>) -> ApiResult<Json<serde_json::Value>> {
    let id = dto.id.clone();
    service::update(dto).await.map_err(from_service)?;
    Ok(Json(json!({ "id": id })))
}

#[derive(Debug, Deserialize)]
pub struct SetPasswordRequest {
    pub password: Option<String>,
}

/// PUT /api/document/:id/password (empty or null clears it)
pub async fn set_password(
    Path(id): Path<String>,
    Json(request): Json<SetPasswordRequest>,
) -> ApiResult<StatusCode> {
    let uuid = parse_uuid(&id)?;
    service::set_password(uuid, request.password)
        .await
        .map_err(from_service)?;
    Ok(StatusCode::OK)
}

/// POST /api/document/:id/signed_url
pub async fn signed_url(Path(id): Path<String>) -> ApiResult<Json<SignedUrlResponse>> {
    let uuid = parse_uuid(&id)?;
    service::signed_url(uuid)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Document"))
}

#[derive(Debug, Default, Deserialize)]
pub struct DownloadParams {
    pub password: Option<String>,
    pub token: Option<String>,
}

fn access_error(denied: AccessDenied) -> ApiError {
    match denied {
        AccessDenied::LoginRequired => ApiError::Unauthorized,
        AccessDenied::PasswordRequired => ApiError::bad_request(denied.to_string()),
        AccessDenied::WrongPassword => ApiError::Forbidden,
    }
}

/// `attachment` disposition with quotes and control characters stripped
fn content_disposition(file_name: &str) -> String {
    let safe: String = file_name
        .chars()
        .filter(|c| !c.is_control() && *c != '"' && *c != '\\')
        .collect();
    format!("attachment; filename=\"{}\"", safe)
}

/// GET /api/document/:id/download?password=...&token=...  (public route)
pub async fn download(
    MaybeUser(user): MaybeUser,
    Path(id): Path<String>,
    Query(params): Query<DownloadParams>,
) -> ApiResult<Response> {
    let uuid = parse_uuid(&id)?;
    let credentials = DownloadCredentials {
        authenticated: user.is_some(),
        password: params.password,
        token: params.token,
    };

    let (document, bytes) = match service::download(uuid, &credentials).await {
        Ok(Some(found)) => found,
        Ok(None) => return Err(ApiError::not_found("Document")),
        Err(e) => {
            return Err(match e.downcast_ref::<AccessDenied>() {
                Some(denied) => access_error(*denied),
                None => from_service(e),
            })
        }
    };

    Ok((
        [
            (header::CONTENT_TYPE, document.content_type.clone()),
            (header::CONTENT_DISPOSITION, content_disposition(&document.file_name)),
        ],
        bytes,
    )
        .into_response())
}

/// DELETE /api/document/:id
pub async fn delete(Path(id): Path<String>) -> ApiResult<StatusCode> {
    let uuid = parse_uuid(&id)?;
    if service::delete(uuid).await? {
        Ok(StatusCode::OK)
    } else {
        Err(ApiError::not_found("Document"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_access_errors_map_to_status() {
        assert_eq!(access_error(AccessDenied::LoginRequired).status(), StatusCode::UNAUTHORIZED);
        assert_eq!(access_error(AccessDenied::PasswordRequired).status(), StatusCode::BAD_REQUEST);
        assert_eq!(access_error(AccessDenied::WrongPassword).status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_content_disposition_strips_quotes() {
        assert_eq!(
            content_disposition("re\"port\n.pdf"),
            "attachment; filename=\"report.pdf\""
        );
    }
}
