use anyhow::{Context, Result};
use chrono::Utc;
use contracts::system::auth::{TokenClaims, UserRole};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tokio::sync::OnceCell;

const ACCESS_TOKEN_LIFETIME_HOURS: i64 = 24;
const REFRESH_TOKEN_LIFETIME_DAYS: i64 = 90;
pub const DOCUMENT_LINK_LIFETIME_MINUTES: i64 = 15;

static JWT_SECRET: OnceCell<String> = OnceCell::const_new();

/// Claims of a signed document download link
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentLinkClaims {
    /// Document id
    pub doc: String,
    pub exp: usize,
    pub iat: usize,
}

pub fn build_claims(user_id: &str, username: &str, role: UserRole) -> TokenClaims {
    let now = Utc::now();
    TokenClaims {
        sub: user_id.to_string(),
        username: username.to_string(),
        role,
        exp: (now + chrono::Duration::hours(ACCESS_TOKEN_LIFETIME_HOURS)).timestamp() as usize,
        iat: now.timestamp() as usize,
    }
}

pub fn encode_with_secret<T: Serialize>(claims: &T, secret: &str) -> Result<String> {
    encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .context("Failed to encode JWT token")
}

pub fn decode_with_secret<T: serde::de::DeserializeOwned>(token: &str, secret: &str) -> Result<T> {
    let data = decode::<T>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .context("Failed to decode JWT token")?;
    Ok(data.claims)
}

/// Generate JWT access token with 24 hours lifetime
pub async fn generate_access_token(user_id: &str, username: &str, role: UserRole) -> Result<String> {
    let claims = build_claims(user_id, username, role);
    let secret = get_jwt_secret().await?;
    encode_with_secret(&claims, secret)
}

/// Validate JWT token and extract claims
pub async fn validate_token(token: &str) -> Result<TokenClaims> {
    let secret = get_jwt_secret().await?;
    decode_with_secret(token, secret)
}

/// Short-lived token granting download of one document
pub async fn generate_document_token(document_id: &str) -> Result<(String, chrono::DateTime<Utc>)> {
    let now = Utc::now();
    let expires_at = now + chrono::Duration::minutes(DOCUMENT_LINK_LIFETIME_MINUTES);
    let claims = DocumentLinkClaims {
        doc: document_id.to_string(),
        exp: expires_at.timestamp() as usize,
        iat: now.timestamp() as usize,
    };
    let secret = get_jwt_secret().await?;
    Ok((encode_with_secret(&claims, secret)?, expires_at))
}

/// True if `token` is a valid, unexpired link for exactly this document
pub async fn validate_document_token(token: &str, document_id: &str) -> bool {
    let secret = match get_jwt_secret().await {
        Ok(s) => s,
        Err(_) => return false,
    };
    matches!(
        decode_with_secret::<DocumentLinkClaims>(token, secret),
        Ok(claims) if claims.doc == document_id
    )
}

/// Generate refresh token (UUID-based)
pub fn generate_refresh_token() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Get or create JWT secret; loaded from sys_settings once per process
pub async fn get_jwt_secret() -> Result<&'static String> {
    JWT_SECRET
        .get_or_try_init(|| async {
            match get_jwt_secret_from_db().await {
                Ok(Some(secret)) => Ok(secret),
                Ok(None) | Err(_) => {
                    let secret = generate_jwt_secret();
                    save_jwt_secret_to_db(&secret).await?;
                    tracing::info!("Generated new JWT secret");
                    Ok::<String, anyhow::Error>(secret)
                }
            }
        })
        .await
}

/// Generate a cryptographically secure JWT secret (256 bits)
fn generate_jwt_secret() -> String {
    use base64::{engine::general_purpose, Engine as _};
    let mut rng = rand::thread_rng();
    let random_bytes: Vec<u8> = (0..32).map(|_| rng.gen::<u8>()).collect();
    general_purpose::STANDARD.encode(&random_bytes)
}

async fn get_jwt_secret_from_db() -> Result<Option<String>> {
    use crate::shared::data::db::get_connection;
    use sea_orm::{ConnectionTrait, DatabaseBackend, Statement};

    let conn = get_connection();

    let result = conn
        .query_one(Statement::from_sql_and_values(
            DatabaseBackend::Sqlite,
            "SELECT value FROM sys_settings WHERE key = ?",
            ["jwt_secret".into()],
        ))
        .await?;

    match result {
        Some(row) => {
            let secret: String = row.try_get("", "value")?;
            Ok(Some(secret))
        }
        None => Ok(None),
    }
}

async fn save_jwt_secret_to_db(secret: &str) -> Result<()> {
    use crate::shared::data::db::get_connection;
    use sea_orm::{ConnectionTrait, DatabaseBackend, Statement};

    let conn = get_connection();
    let now = Utc::now().to_rfc3339();

    conn.execute(Statement::from_sql_and_values(
        DatabaseBackend::Sqlite,
        "INSERT OR REPLACE INTO sys_settings (key, value, description, created_at, updated_at)
         VALUES (?, ?, ?, ?, ?)",
        [
            "jwt_secret".into(),
            secret.to_string().into(),
            "Auto-generated JWT secret for authentication".into(),
            now.clone().into(),
            now.into(),
        ],
    ))
    .await?;

    Ok(())
}

/// Calculate refresh token expiration timestamp
pub fn calculate_refresh_token_expiration() -> String {
    let exp = Utc::now() + chrono::Duration::days(REFRESH_TOKEN_LIFETIME_DAYS);
    exp.to_rfc3339()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_claims_round_trip_keeps_role() {
        let claims = build_claims("u-1", "ayse", UserRole::Admin);
        let token = encode_with_secret(&claims, "test-secret").unwrap();
        let decoded: TokenClaims = decode_with_secret(&token, "test-secret").unwrap();
        assert_eq!(decoded.sub, "u-1");
        assert!(decoded.is_admin());
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let claims = build_claims("u-1", "ayse", UserRole::Staff);
        let token = encode_with_secret(&claims, "secret-a").unwrap();
        assert!(decode_with_secret::<TokenClaims>(&token, "secret-b").is_err());
    }

    #[test]
    fn test_expired_token_rejected() {
        let mut claims = build_claims("u-1", "ayse", UserRole::Staff);
        claims.exp = (Utc::now() - chrono::Duration::hours(2)).timestamp() as usize;
        let token = encode_with_secret(&claims, "s").unwrap();
        assert!(decode_with_secret::<TokenClaims>(&token, "s").is_err());
    }

    #[test]
    fn test_generated_secret_is_256_bits() {
        use base64::{engine::general_purpose, Engine as _};
        let secret = generate_jwt_secret();
        assert_eq!(general_purpose::STANDARD.decode(secret).unwrap().len(), 32);
    }
}
