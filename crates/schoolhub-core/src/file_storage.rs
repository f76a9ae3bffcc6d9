//! Storage backends for uploaded avatar images.
//!
//! Business logic talks to [`FileStorage`]; the server wires in
//! [`LocalFileStorage`], which writes under the upload directory that is also
//! served statically at `/uploads`.
//!
//! ```ignore
//! let storage = LocalFileStorage::new(PathBuf::from("public/uploads"), base_url, 5 * 1024 * 1024);
//! storage.check_upload("image/png", bytes.len())?;
//! let key = storage.save("avatars/2f0c.png", &bytes).await?;
//! let url = storage.get_url(&key)?;
//! ```

use std::fmt;
use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;
use tokio::fs;

pub type StorageFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, StorageError>> + Send + 'a>>;

pub trait FileStorage: Send + Sync {
    /// Rejects uploads that this backend would refuse before any work is done.
    fn check_upload(&self, mime_type: &str, len: usize) -> Result<(), StorageError>;

    /// Stores `content` under `key` and returns the key.
    fn save<'a>(&'a self, key: &'a str, content: &'a [u8]) -> StorageFuture<'a, String>;

    /// Removes the file; a missing file is not an error.
    fn delete<'a>(&'a self, key: &'a str) -> StorageFuture<'a, ()>;

    fn get_url(&self, key: &str) -> Result<String, StorageError>;
}

#[derive(Debug)]
pub enum StorageError {
    InvalidFileSize {
        max_bytes: usize,
    },
    InvalidMimeType {
        received: String,
        allowed: Vec<String>,
    },
    IoError(std::io::Error),
    InvalidKey(String),
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidFileSize { max_bytes } => {
                write!(f, "File exceeds maximum size of {} bytes", max_bytes)
            }
            Self::InvalidMimeType { received, allowed } => {
                write!(
                    f,
                    "MIME type '{}' not allowed. Allowed types: {}",
                    received,
                    allowed.join(", ")
                )
            }
            Self::IoError(e) => write!(f, "I/O error: {}", e),
            Self::InvalidKey(msg) => write!(f, "Invalid storage key: {}", msg),
        }
    }
}

impl std::error::Error for StorageError {}

impl From<std::io::Error> for StorageError {
    fn from(e: std::io::Error) -> Self {
        Self::IoError(e)
    }
}

/// Writes files below `base_dir` and builds URLs under `base_url`.
#[derive(Clone, Debug)]
pub struct LocalFileStorage {
    base_dir: PathBuf,
    base_url: String,
    max_file_size: usize,
    allowed_mime_types: Vec<String>,
}

impl LocalFileStorage {
    pub fn new(base_dir: PathBuf, base_url: String, max_file_size: usize) -> Self {
        Self {
            base_dir,
            base_url,
            max_file_size,
            allowed_mime_types: vec![
                "image/png".to_string(),
                "image/jpeg".to_string(),
                "image/jpg".to_string(),
                "image/gif".to_string(),
                "image/webp".to_string(),
            ],
        }
    }

    pub fn max_file_size(&self) -> usize {
        self.max_file_size
    }

    fn validate_key(key: &str) -> Result<(), StorageError> {
        if key.is_empty() || key.contains("..") || key.starts_with('/') {
            return Err(StorageError::InvalidKey(
                "Key must not be empty, contain '..', or start with '/'".to_string(),
            ));
        }

        if !key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '/' || c == '.')
        {
            return Err(StorageError::InvalidKey(
                "Key contains invalid characters".to_string(),
            ));
        }

        Ok(())
    }
}

impl FileStorage for LocalFileStorage {
    fn check_upload(&self, mime_type: &str, len: usize) -> Result<(), StorageError> {
        if len > self.max_file_size {
            return Err(StorageError::InvalidFileSize {
                max_bytes: self.max_file_size,
            });
        }

        if !self.allowed_mime_types.iter().any(|m| m == mime_type) {
            return Err(StorageError::InvalidMimeType {
                received: mime_type.to_string(),
                allowed: self.allowed_mime_types.clone(),
            });
        }

        Ok(())
    }

    fn save<'a>(&'a self, key: &'a str, content: &'a [u8]) -> StorageFuture<'a, String> {
        Box::pin(async move {
            Self::validate_key(key)?;

            if content.len() > self.max_file_size {
                return Err(StorageError::InvalidFileSize {
                    max_bytes: self.max_file_size,
                });
            }

            let file_path = self.base_dir.join(key);
            if let Some(parent) = file_path.parent() {
                fs::create_dir_all(parent).await?;
            }
            fs::write(&file_path, content).await?;

            tracing::debug!(key, bytes = content.len(), "Stored file");
            Ok(key.to_string())
        })
    }

    fn delete<'a>(&'a self, key: &'a str) -> StorageFuture<'a, ()> {
        Box::pin(async move {
            Self::validate_key(key)?;

            match fs::remove_file(self.base_dir.join(key)).await {
                Ok(_) => Ok(()),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
                Err(e) => Err(e.into()),
            }
        })
    }

    fn get_url(&self, key: &str) -> Result<String, StorageError> {
        Self::validate_key(key)?;
        Ok(format!("{}/{}", self.base_url.trim_end_matches('/'), key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn storage_in(dir: PathBuf) -> LocalFileStorage {
        LocalFileStorage::new(dir, "http://localhost:3000/uploads".to_string(), 16)
    }

    #[test]
    fn test_validate_key() {
        assert!(LocalFileStorage::validate_key("avatars/abc-123.png").is_ok());
        assert!(LocalFileStorage::validate_key("avatars/profile_pic.webp").is_ok());
        assert!(LocalFileStorage::validate_key("../../../etc/passwd").is_err());
        assert!(LocalFileStorage::validate_key("/etc/passwd").is_err());
        assert!(LocalFileStorage::validate_key("\\windows\\system32").is_err());
        assert!(LocalFileStorage::validate_key("").is_err());
    }

    #[test]
    fn test_check_upload() {
        let storage = storage_in(PathBuf::from("./uploads"));
        assert!(storage.check_upload("image/png", 16).is_ok());
        assert!(matches!(
            storage.check_upload("image/png", 17),
            Err(StorageError::InvalidFileSize { max_bytes: 16 })
        ));
        assert!(matches!(
            storage.check_upload("application/pdf", 4),
            Err(StorageError::InvalidMimeType { .. })
        ));
    }

    #[test]
    fn test_get_url_handles_trailing_slash() {
        let storage = LocalFileStorage::new(
            PathBuf::from("./uploads"),
            "http://localhost:3000/uploads/".to_string(),
            16,
        );
        assert_eq!(
            storage.get_url("avatars/a.png").unwrap(),
            "http://localhost:3000/uploads/avatars/a.png"
        );
    }

    #[tokio::test]
    async fn test_save_and_delete_round_trip() {
        let dir = std::env::temp_dir().join(format!("schoolhub-storage-{}", uuid::Uuid::new_v4()));
        let storage = storage_in(dir.clone());

        let key = storage.save("avatars/a.png", b"png-bytes").await.unwrap();
        assert_eq!(tokio::fs::read(dir.join(&key)).await.unwrap(), b"png-bytes");

        storage.delete(&key).await.unwrap();
        assert!(!dir.join(&key).exists());
        storage.delete(&key).await.unwrap();

        assert!(matches!(
            storage.save("avatars/b.png", &[0u8; 32]).await,
            Err(StorageError::InvalidFileSize { .. })
        ));

        let _ = tokio::fs::remove_dir_all(dir).await;
    }
}
