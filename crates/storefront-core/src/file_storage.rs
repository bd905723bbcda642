//! Object storage abstraction for store assets.
//!
//! Business logic talks to [`FileStorage`] only, so the local filesystem
//! backend can be swapped for an S3-compatible bucket without touching the
//! repositories.
//!
//! # Example
//!
//! ```ignore
//! use storefront_core::file_storage::{FileStorage, LocalFileStorage};
//! use std::path::PathBuf;
//!
//! let storage = LocalFileStorage::new(
//!     PathBuf::from("./storage/uploads"),
//!     "http://localhost:3000/files".to_string(),
//! );
//!
//! let key = storage.save("stores/42/logo.png", "image/png", &bytes).await?;
//! let url = storage.get_url(&key)?;
//! storage.delete(&key).await?;
//! ```

use std::path::PathBuf;

use async_trait::async_trait;
use thiserror::Error;
use tokio::fs;

use crate::errors::AppError;

pub const DEFAULT_MAX_FILE_SIZE: usize = 5 * 1024 * 1024;

/// Abstract trait for object storage backends.
#[async_trait]
pub trait FileStorage: Send + Sync {
    /// Save file content under `key` and return the storage key.
    async fn save(&self, key: &str, content_type: &str, content: &[u8])
    -> Result<String, StorageError>;

    /// Delete a file by key. Missing files are not an error.
    async fn delete(&self, key: &str) -> Result<(), StorageError>;

    /// Public URL for accessing a stored file.
    fn get_url(&self, key: &str) -> Result<String, StorageError>;
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("File exceeds maximum size of {max_bytes} bytes")]
    InvalidFileSize { max_bytes: usize },

    #[error("MIME type '{received}' not allowed. Allowed types: {}", allowed.join(", "))]
    InvalidMimeType {
        received: String,
        allowed: Vec<String>,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),
}

impl StorageError {
    /// Size and type violations are the caller's fault; everything else is a fault.
    pub fn into_app_error(self) -> AppError {
        match self {
            StorageError::InvalidFileSize { .. } => AppError::payload_too_large(self.to_string()),
            StorageError::InvalidMimeType { .. } => {
                AppError::unsupported_media_type(self.to_string())
            }
            StorageError::Io(_) | StorageError::InvalidKey(_) => AppError::internal(self),
        }
    }
}

/// Local filesystem-based storage, served under `base_url`.
#[derive(Clone, Debug)]
pub struct LocalFileStorage {
    base_dir: PathBuf,
    base_url: String,
    max_file_size: usize,
    allowed_mime_types: Vec<String>,
}

impl LocalFileStorage {
    pub fn new(base_dir: PathBuf, base_url: String) -> Self {
        Self::with_max_size(base_dir, base_url, DEFAULT_MAX_FILE_SIZE)
    }

    pub fn with_max_size(base_dir: PathBuf, base_url: String, max_file_size: usize) -> Self {
        Self {
            base_dir,
            base_url,
            max_file_size,
            allowed_mime_types: vec![
                "image/png".to_string(),
                "image/jpeg".to_string(),
                "image/webp".to_string(),
            ],
        }
    }

    /// Reject keys that could escape `base_dir`.
    fn validate_key(key: &str) -> Result<(), StorageError> {
        if key.is_empty() || key.contains("..") || key.starts_with('/') || key.starts_with('\\')
        {
            return Err(StorageError::InvalidKey(
                "Key must not be empty, contain '..', or start with a path separator".to_string(),
            ));
        }

        if !key
            .chars()
            .all(|c| c.is_alphanumeric() || c == '-' || c == '_' || c == '/' || c == '.')
        {
            return Err(StorageError::InvalidKey(
                "Key contains invalid characters".to_string(),
            ));
        }

        Ok(())
    }

    fn validate_content(&self, content_type: &str, content: &[u8]) -> Result<(), StorageError> {
        if !self.allowed_mime_types.iter().any(|m| m == content_type) {
            return Err(StorageError::InvalidMimeType {
                received: content_type.to_string(),
                allowed: self.allowed_mime_types.clone(),
            });
        }

        if content.len() > self.max_file_size {
            return Err(StorageError::InvalidFileSize {
                max_bytes: self.max_file_size,
            });
        }

        Ok(())
    }
}

#[async_trait]
impl FileStorage for LocalFileStorage {
    async fn save(
        &self,
        key: &str,
        content_type: &str,
        content: &[u8],
    ) -> Result<String, StorageError> {
        Self::validate_key(key)?;
        self.validate_content(content_type, content)?;

        let file_path = self.base_dir.join(key);
        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent).await?;
        }
        fs::write(&file_path, content).await?;

        Ok(key.to_string())
    }

    async fn delete(&self, key: &str) -> Result<(), StorageError> {
        Self::validate_key(key)?;

        match fs::remove_file(self.base_dir.join(key)).await {
            Ok(_) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn get_url(&self, key: &str) -> Result<String, StorageError> {
        Self::validate_key(key)?;
        Ok(format!("{}/{}", self.base_url.trim_end_matches('/'), key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    fn temp_storage(max: usize) -> (LocalFileStorage, PathBuf) {
        let dir = std::env::temp_dir().join(format!(
            "storefront-storage-{}-{}",
            std::process::id(),
            max
        ));
        (
            LocalFileStorage::with_max_size(
                dir.clone(),
                "http://localhost:3000/files".to_string(),
                max,
            ),
            dir,
        )
    }

    #[test]
    fn test_validate_key_accepts_valid_keys() {
        assert!(LocalFileStorage::validate_key("stores/42/logo.png").is_ok());
        assert!(LocalFileStorage::validate_key("stores/abc-123.jpg").is_ok());
    }

    #[test]
    fn test_validate_key_rejects_traversal_and_absolute_paths() {
        assert!(LocalFileStorage::validate_key("../../../etc/passwd").is_err());
        assert!(LocalFileStorage::validate_key("/etc/passwd").is_err());
        assert!(LocalFileStorage::validate_key("\\windows\\system32").is_err());
        assert!(LocalFileStorage::validate_key("").is_err());
    }

    #[test]
    fn test_get_url_handles_trailing_slash() {
        let storage = LocalFileStorage::new(
            PathBuf::from("./uploads"),
            "http://localhost:3000/files/".to_string(),
        );

        let url = storage.get_url("stores/logo.png").unwrap();
        assert_eq!(url, "http://localhost:3000/files/stores/logo.png");
    }

    #[tokio::test]
    async fn test_save_and_delete_round_trip() {
        let (storage, dir) = temp_storage(1024);

        let key = storage
            .save("stores/1/logo.png", "image/png", b"png-bytes")
            .await
            .unwrap();
        let written = tokio::fs::read(dir.join(&key)).await.unwrap();
        assert_eq!(written, b"png-bytes");

        storage.delete(&key).await.unwrap();
        assert!(!dir.join(&key).exists());
        // deleting twice is fine
        storage.delete(&key).await.unwrap();

        let _ = tokio::fs::remove_dir_all(dir).await;
    }

    #[tokio::test]
    async fn test_save_rejects_oversized_and_unknown_types() {
        let (storage, _dir) = temp_storage(4);

        let too_big = storage.save("a.png", "image/png", b"12345").await;
        assert!(matches!(
            too_big,
            Err(StorageError::InvalidFileSize { max_bytes: 4 })
        ));

        let bad_type = storage.save("a.gif", "image/gif", b"1").await;
        assert!(matches!(bad_type, Err(StorageError::InvalidMimeType { .. })));
    }

    #[test]
    fn test_storage_errors_map_to_domain_statuses() {
        let err = StorageError::InvalidFileSize { max_bytes: 1 }.into_app_error();
        assert_eq!(err.status, StatusCode::PAYLOAD_TOO_LARGE);

        let err = StorageError::InvalidMimeType {
            received: "text/plain".to_string(),
            allowed: vec!["image/png".to_string()],
        }
        .into_app_error();
        assert_eq!(err.status, StatusCode::UNSUPPORTED_MEDIA_TYPE);

        let err = StorageError::InvalidKey("bad".to_string()).into_app_error();
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
    }
}
