use axum::Json;
use contracts::integrations::email::{SendEmailRequest, SendEmailResponse};

use crate::integrations::email::{self, EmailError};
use crate::shared::error::{ApiError, ApiResult};
use crate::system::auth::extractor::CurrentUser;

/// POST /api/admin/email (admin)
pub async fn send(
    CurrentUser(claims): CurrentUser,
    Json(request): Json<SendEmailRequest>,
) -> ApiResult<Json<SendEmailResponse>> {
    match email::send(&request).await {
        Ok(response) => {
            tracing::info!("Email sent by {}", claims.username);
            Ok(Json(response))
        }
        Err(EmailError::InvalidRequest(msg)) => Err(ApiError::BadRequest(msg)),
        Err(e) => Err(ApiError::Internal(e.into())),
    }
}
