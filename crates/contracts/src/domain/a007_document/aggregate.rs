use crate::domain::common::base_aggregate::{generate_code, normalize_opt};
use crate::domain::common::BaseAggregate;
use crate::{define_aggregate_id, impl_aggregate_root};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

define_aggregate_id!(DocumentId);

/// Who may download a document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DocumentVisibility {
    /// Staff only
    #[default]
    Internal,
    /// Anyone with the link (and the password, if one is set)
    Public,
}

impl DocumentVisibility {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentVisibility::Internal => "internal",
            DocumentVisibility::Public => "public",
        }
    }
}

impl FromStr for DocumentVisibility {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "internal" => Ok(DocumentVisibility::Internal),
            "public" => Ok(DocumentVisibility::Public),
            other => Err(anyhow::anyhow!("Unknown document visibility: {}", other)),
        }
    }
}

/// Uploaded file with visibility tag and optional access password.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    #[serde(flatten)]
    pub base: BaseAggregate<DocumentId>,

    pub entity_type: DocumentVisibility,
    pub file_name: String,
    pub content_type: String,
    pub size_bytes: i64,
    /// Key of the blob in document storage
    pub storage_key: String,
    pub customer_id: Option<String>,

    /// argon2 hash; never sent to clients
    #[serde(skip)]
    pub access_password_hash: Option<String>,
    #[serde(default)]
    pub password_protected: bool,
}

impl Document {
    pub fn new_for_upload(meta: &DocumentUploadMeta, file_name: &str, content_type: &str) -> Self {
        let code = generate_code("DOC");
        let description =
            normalize_opt(meta.description.clone()).unwrap_or_else(|| file_name.to_string());
        let id = DocumentId::new_v4();
        let mut base = BaseAggregate::new(id, code, description);
        base.comment = normalize_opt(meta.comment.clone());

        Self {
            base,
            entity_type: meta.entity_type.unwrap_or_default(),
            file_name: file_name.to_string(),
            content_type: content_type.to_string(),
            size_bytes: 0,
            storage_key: id.value().simple().to_string(),
            customer_id: normalize_opt(meta.customer_id.clone()),
            access_password_hash: None,
            password_protected: false,
        }
    }

    pub fn set_password_hash(&mut self, hash: Option<String>) {
        self.password_protected = hash.is_some();
        self.access_password_hash = hash;
    }

    pub fn update(&mut self, dto: &DocumentDto) {
        self.base.description = dto.description.clone();
        self.base.comment = dto.comment.clone();
        self.entity_type = dto.entity_type;
        self.customer_id = normalize_opt(dto.customer_id.clone());
    }

    pub fn is_public(&self) -> bool {
        self.entity_type == DocumentVisibility::Public
    }

    pub fn validate(&self) -> Result<(), String> {
        self.base.validate()?;
        if self.file_name.trim().is_empty() {
            return Err("File name cannot be empty".into());
        }
        if self.file_name.contains(['/', '\\']) {
            return Err("File name must not contain path separators".into());
        }
        Ok(())
    }

    pub fn before_write(&mut self) {
        self.base.touch();
    }
}

impl_aggregate_root!(Document, DocumentId, "a007", "document", "Document");

/// Metadata fields sent along with the file in a multipart upload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocumentUploadMeta {
    pub description: Option<String>,
    pub comment: Option<String>,
    pub entity_type: Option<DocumentVisibility>,
    pub customer_id: Option<String>,
    /// Plain password; hashed before storing
    pub access_password: Option<String>,
}

/// Metadata edit (the file itself is immutable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentDto {
    pub id: String,
    pub description: String,
    pub comment: Option<String>,
    pub entity_type: DocumentVisibility,
    pub customer_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignedUrlResponse {
    pub url: String,
    pub expires_at: chrono::DateTime<chrono::Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upload_defaults_to_internal() {
        let doc = Document::new_for_upload(&DocumentUploadMeta::default(), "report.pdf", "application/pdf");
        assert_eq!(doc.entity_type, DocumentVisibility::Internal);
        assert_eq!(doc.base.description, "report.pdf");
        assert!(!doc.password_protected);
        assert!(doc.validate().is_ok());
    }

    #[test]
    fn test_password_hash_is_not_serialized() {
        let mut doc = Document::new_for_upload(&DocumentUploadMeta::default(), "a.pdf", "application/pdf");
        doc.set_password_hash(Some("$argon2id$secret".into()));
        let json = serde_json::to_string(&doc).unwrap();
        assert!(!json.contains("argon2"));
        assert!(json.contains("\"password_protected\":true"));
    }

    #[test]
    fn test_path_in_file_name_rejected() {
        let doc = Document::new_for_upload(&DocumentUploadMeta::default(), "../etc/passwd", "text/plain");
        assert!(doc.validate().is_err());
    }
}
