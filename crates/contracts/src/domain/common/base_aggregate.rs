use super::EntityMetadata;
use serde::{Deserialize, Serialize};

/// Fields shared by every aggregate
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BaseAggregate<Id> {
    pub id: Id,
    /// Business code (e.g. "CUS-0001", "VIS-2025-0042")
    pub code: String,
    pub description: String,
    pub comment: Option<String>,
    pub metadata: EntityMetadata,
}

impl<Id> BaseAggregate<Id> {
    pub fn new(id: Id, code: String, description: String) -> Self {
        Self {
            id,
            code,
            description,
            comment: None,
            metadata: EntityMetadata::new(),
        }
    }

    /// Rebuild an aggregate loaded from the database
    pub fn with_metadata(
        id: Id,
        code: String,
        description: String,
        comment: Option<String>,
        metadata: EntityMetadata,
    ) -> Self {
        Self {
            id,
            code,
            description,
            comment,
            metadata,
        }
    }

    pub fn touch(&mut self) {
        self.metadata.touch();
    }

    /// Common checks for code and description
    pub fn validate(&self) -> Result<(), String> {
        if self.description.trim().is_empty() {
            return Err("Description cannot be empty".into());
        }
        if self.code.trim().is_empty() {
            return Err("Code cannot be empty".into());
        }
        Ok(())
    }
}

/// Generate a business code like `CUS-1A2B3C4D` when the client sent none.
pub fn generate_code(prefix: &str) -> String {
    let raw = uuid::Uuid::new_v4().simple().to_string();
    format!("{}-{}", prefix, raw[..8].to_uppercase())
}

/// Trim an optional string and drop it when empty.
pub fn normalize_opt(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_code_has_prefix() {
        let code = generate_code("CUS");
        assert!(code.starts_with("CUS-"));
        assert_eq!(code.len(), 12);
    }

    #[test]
    fn test_normalize_opt() {
        assert_eq!(normalize_opt(Some("  ".into())), None);
        assert_eq!(normalize_opt(Some(" a ".into())), Some("a".to_string()));
        assert_eq!(normalize_opt(None), None);
    }

    #[test]
    fn test_base_validate() {
        let base = BaseAggregate::new(1, "C-1".to_string(), " ".to_string());
        assert!(base.validate().is_err());
        let base = BaseAggregate::new(1, "C-1".to_string(), "Acme".to_string());
        assert!(base.validate().is_ok());
    }
}
