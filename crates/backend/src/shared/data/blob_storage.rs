use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use crate::shared::config;

/// Uploaded document bytes on the local filesystem, one file per storage key
#[derive(Debug, Clone)]
pub struct BlobStorage {
    root: PathBuf,
}

impl BlobStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Storage rooted at the configured documents directory
    pub fn from_config() -> Self {
        Self::new(config::get_documents_dir(config::get()))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> Result<PathBuf> {
        // Keys are generated by us (simple UUIDs); anything else is rejected
        if key.is_empty() || !key.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
            anyhow::bail!("Invalid storage key: {}", key);
        }
        Ok(self.root.join(key))
    }

    pub async fn put(&self, key: &str, bytes: &[u8]) -> Result<()> {
        let path = self.path_for(key)?;
        tokio::fs::create_dir_all(&self.root)
            .await
            .with_context(|| format!("Cannot create storage dir {}", self.root.display()))?;
        tokio::fs::write(&path, bytes)
            .await
            .with_context(|| format!("Cannot write blob {}", path.display()))?;
        tracing::debug!("Stored blob {} ({} bytes)", key, bytes.len());
        Ok(())
    }

    pub async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let path = self.path_for(key)?;
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e).with_context(|| format!("Cannot read blob {}", path.display())),
        }
    }

    pub async fn delete(&self, key: &str) -> Result<bool> {
        let path = self.path_for(key)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e).with_context(|| format!("Cannot delete blob {}", path.display())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_storage() -> BlobStorage {
        BlobStorage::new(std::env::temp_dir().join(format!("blobs-{}", uuid::Uuid::new_v4())))
    }

    #[tokio::test]
    async fn test_put_get_delete() {
        let storage = temp_storage();
        storage.put("abc123", b"hello").await.unwrap();
        assert_eq!(storage.get("abc123").await.unwrap(), Some(b"hello".to_vec()));
        assert!(storage.delete("abc123").await.unwrap());
        assert_eq!(storage.get("abc123").await.unwrap(), None);
        assert!(!storage.delete("abc123").await.unwrap());
        let _ = std::fs::remove_dir_all(storage.root());
    }

    #[tokio::test]
    async fn test_traversal_key_rejected() {
        let storage = temp_storage();
        assert!(storage.put("../escape", b"x").await.is_err());
        assert!(storage.get("a/b").await.is_err());
    }
}
