use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

/// Error returned by HTTP handlers, rendered as `{"error": message}`
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error("Unauthorized")]
    Unauthorized,
    #[error("Forbidden")]
    Forbidden,
    #[error("{0} not found")]
    NotFound(String),
    #[error("{0}")]
    Internal(#[from] anyhow::Error),
}

pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest(message.into())
    }

    pub fn not_found(what: impl Into<String>) -> Self {
        ApiError::NotFound(what.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if let ApiError::Internal(ref e) = self {
            tracing::error!("Request failed: {:#}", e);
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

/// Parse a path id, answering 400 on garbage
pub fn parse_uuid(id: &str) -> ApiResult<uuid::Uuid> {
    uuid::Uuid::parse_str(id).map_err(|_| ApiError::bad_request(format!("Invalid id: {}", id)))
}

/// Services report validation failures as `anyhow` errors prefixed with
/// this marker so handlers can answer 400 instead of 500.
pub const VALIDATION_PREFIX: &str = "Validation failed: ";

pub fn validation_error(message: impl std::fmt::Display) -> anyhow::Error {
    anyhow::anyhow!("{}{}", VALIDATION_PREFIX, message)
}

/// Marker for a missing target record, answered with 404
pub const NOT_FOUND_PREFIX: &str = "Not found: ";

pub fn not_found_error(what: impl std::fmt::Display) -> anyhow::Error {
    anyhow::anyhow!("{}{}", NOT_FOUND_PREFIX, what)
}

/// Map a service error: validation → 400, missing record → 404, anything else → 500
pub fn from_service(e: anyhow::Error) -> ApiError {
    let message = e.to_string();
    if let Some(rest) = message.strip_prefix(VALIDATION_PREFIX) {
        return ApiError::BadRequest(rest.to_string());
    }
    match message.strip_prefix(NOT_FOUND_PREFIX) {
        Some(what) => ApiError::NotFound(what.to_string()),
        None => ApiError::Internal(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(ApiError::bad_request("x").status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::Unauthorized.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::Forbidden.status(), StatusCode::FORBIDDEN);
        assert_eq!(ApiError::not_found("Visit").status(), StatusCode::NOT_FOUND);
        assert_eq!(
            ApiError::Internal(anyhow::anyhow!("db down")).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_validation_errors_become_bad_request() {
        let err = from_service(validation_error("End km must be greater than start km"));
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.to_string(), "End km must be greater than start km");

        let err = from_service(anyhow::anyhow!("disk I/O error"));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_missing_record_becomes_not_found() {
        let err = from_service(not_found_error("Visit"));
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        assert_eq!(err.to_string(), "Visit not found");
    }

    #[test]
    fn test_parse_uuid() {
        assert!(parse_uuid("nope").is_err());
        assert!(parse_uuid(&uuid::Uuid::new_v4().to_string()).is_ok());
    }

    #[tokio::test]
    async fn test_error_body_is_json() {
        let response = ApiError::not_found("Customer").into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"], "Customer not found");
    }
}
