use axum::{body::Body, extract::Request, http::HeaderMap, middleware::Next, response::Response};
use contracts::system::auth::TokenClaims;

use crate::shared::error::ApiError;

/// Token from `Authorization: Bearer <token>`
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

async fn claims_from(headers: &HeaderMap) -> Result<TokenClaims, ApiError> {
    let token = bearer_token(headers).ok_or(ApiError::Unauthorized)?;
    super::jwt::validate_token(token)
        .await
        .map_err(|_| ApiError::Unauthorized)
}

/// Middleware that requires valid JWT authentication
pub async fn require_auth(mut req: Request<Body>, next: Next) -> Result<Response, ApiError> {
    let claims = claims_from(req.headers()).await?;

    // Add claims to request extensions for use in handlers
    req.extensions_mut().insert(claims);

    Ok(next.run(req).await)
}

/// Middleware that requires the admin role claim
pub async fn require_admin(mut req: Request<Body>, next: Next) -> Result<Response, ApiError> {
    let claims = claims_from(req.headers()).await?;

    if !claims.is_admin() {
        tracing::warn!("User {} denied access to {}", claims.username, req.uri().path());
        return Err(ApiError::Forbidden);
    }

    req.extensions_mut().insert(claims);

    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_bearer_token_extraction() {
        let mut headers = HeaderMap::new();
        assert_eq!(bearer_token(&headers), None);

        headers.insert("Authorization", HeaderValue::from_static("Basic abc"));
        assert_eq!(bearer_token(&headers), None);

        headers.insert("Authorization", HeaderValue::from_static("Bearer "));
        assert_eq!(bearer_token(&headers), None);

        headers.insert("Authorization", HeaderValue::from_static("Bearer abc.def"));
        assert_eq!(bearer_token(&headers), Some("abc.def"));
    }

    #[test]
    fn test_layers_mount_on_router() {
        let _app: axum::Router = axum::Router::new()
            .route("/private", axum::routing::get(|| async { "ok" }))
            .route_layer(axum::middleware::from_fn(require_auth))
            .route("/admin", axum::routing::get(|| async { "ok" }))
            .route_layer(axum::middleware::from_fn(require_admin));
    }

    #[tokio::test]
    async fn test_missing_token_is_unauthorized() {
        let result = claims_from(&HeaderMap::new()).await;
        assert!(matches!(result, Err(ApiError::Unauthorized)));
    }
}
