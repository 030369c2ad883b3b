use super::repository;
use contracts::domain::a007_document::aggregate::{
    Document, DocumentDto, DocumentUploadMeta, SignedUrlResponse,
};
use uuid::Uuid;

use crate::shared::config;
use crate::shared::data::blob_storage::BlobStorage;
use crate::shared::error::{not_found_error, validation_error};
use crate::system::auth::{jwt, password};

/// Why a download was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AccessDenied {
    #[error("Authentication required")]
    LoginRequired,
    #[error("Password required")]
    PasswordRequired,
    #[error("Wrong password")]
    WrongPassword,
}

/// What the caller presented with a download request
#[derive(Debug, Clone, Default)]
pub struct DownloadCredentials {
    pub authenticated: bool,
    pub password: Option<String>,
    pub token: Option<String>,
}

/// Visibility and password rules. A valid signed link bypasses both.
pub fn check_access(
    document: &Document,
    credentials: &DownloadCredentials,
    token_valid: bool,
) -> Result<(), AccessDenied> {
    if token_valid {
        return Ok(());
    }
    if !document.is_public() {
        return if credentials.authenticated {
            Ok(())
        } else {
            Err(AccessDenied::LoginRequired)
        };
    }

    let Some(hash) = document.access_password_hash.as_deref() else {
        return Ok(());
    };
    let Some(presented) = credentials.password.as_deref().filter(|p| !p.is_empty()) else {
        return Err(AccessDenied::PasswordRequired);
    };
    match password::verify_password(presented, hash) {
        Ok(true) => Ok(()),
        Ok(false) => Err(AccessDenied::WrongPassword),
        Err(e) => {
            tracing::warn!("Document {}: password hash unreadable: {}", document.base.id.value(), e);
            Err(AccessDenied::WrongPassword)
        }
    }
}

pub async fn upload(
    meta: DocumentUploadMeta,
    file_name: &str,
    content_type: &str,
    bytes: Vec<u8>,
) -> anyhow::Result<Document> {
    if bytes.is_empty() {
        return Err(validation_error("File is empty"));
    }

    let mut document = Document::new_for_upload(&meta, file_name.trim(), content_type);
    document.size_bytes = bytes.len() as i64;
    if let Some(plain) = meta.access_password.as_deref().filter(|p| !p.is_empty()) {
        document.set_password_hash(Some(password::hash_password(plain)?));
    }

    document.validate().map_err(validation_error)?;
    document.before_write();

    let storage = BlobStorage::from_config();
    storage.put(&document.storage_key, &bytes).await?;
    if let Err(e) = repository::insert(&document).await {
        // Don't leave an orphan blob behind
        let _ = storage.delete(&document.storage_key).await;
        return Err(e);
    }

    tracing::info!(
        "Document {} uploaded: {} ({} bytes, {})",
        document.base.code,
        document.file_name,
        document.size_bytes,
        document.entity_type.as_str()
    );
    Ok(document)
}

pub async fn update(dto: DocumentDto) -> anyhow::Result<()> {
    let id = Uuid::parse_str(&dto.id).map_err(|_| validation_error("Invalid ID"))?;
    let mut document = get_by_id(id)
        .await?
        .ok_or_else(|| not_found_error("Document"))?;

    document.update(&dto);
    document.validate().map_err(validation_error)?;
    document.before_write();
    document.base.metadata.increment_version();

    repository::update(&document).await
}

/// Replace or clear the access password
pub async fn set_password(id: Uuid, plain: Option<String>) -> anyhow::Result<()> {
    let mut document = get_by_id(id)
        .await?
        .ok_or_else(|| not_found_error("Document"))?;

    let hash = match plain.as_deref().filter(|p| !p.is_empty()) {
        Some(p) => Some(password::hash_password(p)?),
        None => None,
    };
    document.set_password_hash(hash);
    document.before_write();
    document.base.metadata.increment_version();

    repository::update(&document).await
}

/// Fetch the document bytes if `credentials` satisfy its access rules.
/// `Ok(None)` means the document does not exist.
pub async fn download(
    id: Uuid,
    credentials: &DownloadCredentials,
) -> anyhow::Result<Option<(Document, Vec<u8>)>> {
    let Some(document) = get_by_id(id).await? else {
        return Ok(None);
    };

    let token_valid = match credentials.token.as_deref() {
        Some(token) => jwt::validate_document_token(token, &id.to_string()).await,
        None => false,
    };
    check_access(&document, credentials, token_valid)?;

    let bytes = BlobStorage::from_config()
        .get(&document.storage_key)
        .await?
        .ok_or_else(|| anyhow::anyhow!("Blob {} missing from storage", document.storage_key))?;

    Ok(Some((document, bytes)))
}

/// Issue a short-lived download link for one document
pub async fn signed_url(id: Uuid) -> anyhow::Result<Option<SignedUrlResponse>> {
    if get_by_id(id).await?.is_none() {
        return Ok(None);
    }

    let (token, expires_at) = jwt::generate_document_token(&id.to_string()).await?;
    let base = config::get().server.public_url.trim_end_matches('/');
    Ok(Some(SignedUrlResponse {
        url: format!("{}/api/document/{}/download?token={}", base, id, token),
        expires_at,
    }))
}

pub async fn delete(id: Uuid) -> anyhow::Result<bool> {
    repository::soft_delete(id).await
}

pub async fn get_by_id(id: Uuid) -> anyhow::Result<Option<Document>> {
    Ok(repository::get_by_id(id)
        .await?
        .filter(|d| !d.base.metadata.is_deleted))
}

pub async fn list_all() -> anyhow::Result<Vec<Document>> {
    repository::list_all().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::domain::a007_document::aggregate::DocumentVisibility;

    fn document(visibility: DocumentVisibility, password: Option<&str>) -> Document {
        let meta = DocumentUploadMeta {
            entity_type: Some(visibility),
            ..Default::default()
        };
        let mut doc = Document::new_for_upload(&meta, "report.pdf", "application/pdf");
        doc.set_password_hash(password.map(|p| password::hash_password(p).unwrap()));
        doc
    }

    fn anonymous() -> DownloadCredentials {
        DownloadCredentials::default()
    }

    #[test]
    fn test_internal_requires_login() {
        let doc = document(DocumentVisibility::Internal, None);
        assert_eq!(check_access(&doc, &anonymous(), false), Err(AccessDenied::LoginRequired));

        let staff = DownloadCredentials {
            authenticated: true,
            ..Default::default()
        };
        assert_eq!(check_access(&doc, &staff, false), Ok(()));
    }

    #[test]
    fn test_public_without_password_is_open() {
        let doc = document(DocumentVisibility::Public, None);
        assert_eq!(check_access(&doc, &anonymous(), false), Ok(()));
    }

    #[test]
    fn test_public_with_password() {
        let doc = document(DocumentVisibility::Public, Some("s3cret"));
        assert_eq!(
            check_access(&doc, &anonymous(), false),
            Err(AccessDenied::PasswordRequired)
        );

        let wrong = DownloadCredentials {
            password: Some("guess".into()),
            ..Default::default()
        };
        assert_eq!(check_access(&doc, &wrong, false), Err(AccessDenied::WrongPassword));

        let right = DownloadCredentials {
            password: Some("s3cret".into()),
            ..Default::default()
        };
        assert_eq!(check_access(&doc, &right, false), Ok(()));
    }

    #[test]
    fn test_signed_link_bypasses_rules() {
        let doc = document(DocumentVisibility::Internal, Some("s3cret"));
        assert_eq!(check_access(&doc, &anonymous(), true), Ok(()));
    }
}
