//! Avatar payloads sent inline as `data:image/<type>;base64,<payload>` URLs.
//!
//! Payloads are decoded and checked against the storage limits before any
//! record is written, so an oversized image fails the whole request up front.

use anyhow::anyhow;
use data_encoding::BASE64;
use schoolhub_core::AppError;
use schoolhub_core::file_storage::{FileStorage, StorageError};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedAvatar {
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl DecodedAvatar {
    pub fn extension(&self) -> &'static str {
        match self.mime_type.as_str() {
            "image/png" => "png",
            "image/gif" => "gif",
            "image/webp" => "webp",
            _ => "jpg",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AvatarInput {
    /// Inline image that must be written to storage.
    Inline(DecodedAvatar),
    /// Anything else, typically an absolute URL.
    Link(String),
}

impl AvatarInput {
    /// Inline images only; links are dropped.
    pub fn inline_only(self) -> Option<DecodedAvatar> {
        match self {
            AvatarInput::Inline(avatar) => Some(avatar),
            AvatarInput::Link(_) => None,
        }
    }
}

/// Splits a data URL into its MIME type and decoded bytes. Returns `Ok(None)`
/// when `raw` is not a data URL at all.
pub fn decode_data_url(raw: &str) -> Result<Option<DecodedAvatar>, AppError> {
    let Some(rest) = raw.strip_prefix("data:") else {
        return Ok(None);
    };

    let (mime_type, payload) = rest
        .split_once(";base64,")
        .ok_or_else(|| AppError::bad_request(anyhow!("Avatar must be a base64 data URL")))?;

    let bytes = BASE64
        .decode(payload.trim().as_bytes())
        .map_err(|_| AppError::bad_request(anyhow!("Avatar data is not valid base64")))?;

    Ok(Some(DecodedAvatar {
        mime_type: mime_type.to_ascii_lowercase(),
        bytes,
    }))
}

/// Parses and pre-checks an avatar field. Blank values count as absent.
pub fn prepare_avatar(
    raw: Option<&str>,
    storage: &dyn FileStorage,
) -> Result<Option<AvatarInput>, AppError> {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(None);
    };

    match decode_data_url(raw)? {
        Some(avatar) => {
            storage
                .check_upload(&avatar.mime_type, avatar.bytes.len())
                .map_err(storage_error)?;
            Ok(Some(AvatarInput::Inline(avatar)))
        }
        None => Ok(Some(AvatarInput::Link(raw.to_string()))),
    }
}

/// Writes the image under `avatars/` and returns its public URL.
pub async fn store_avatar(
    storage: &dyn FileStorage,
    owner_id: Uuid,
    avatar: &DecodedAvatar,
) -> Result<(String, String), AppError> {
    let key = format!("avatars/{}-{}.{}", owner_id, Uuid::new_v4(), avatar.extension());
    let key = storage.save(&key, &avatar.bytes).await.map_err(storage_error)?;
    let url = storage.get_url(&key).map_err(storage_error)?;
    Ok((key, url))
}

fn storage_error(err: StorageError) -> AppError {
    match err {
        StorageError::InvalidFileSize { .. } => AppError::payload_too_large(err.to_string()),
        StorageError::InvalidMimeType { .. } => AppError::bad_request(anyhow!(err.to_string())),
        StorageError::InvalidKey(_) | StorageError::IoError(_) => AppError::internal(err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use schoolhub_core::file_storage::LocalFileStorage;
    use std::path::PathBuf;

    fn storage(max_bytes: usize) -> LocalFileStorage {
        let dir = std::env::temp_dir().join(format!("schoolhub-avatar-{}", Uuid::new_v4()));
        LocalFileStorage::new(dir, "http://localhost:3000/uploads".to_string(), max_bytes)
    }

    fn data_url(mime: &str, bytes: &[u8]) -> String {
        format!("data:{};base64,{}", mime, BASE64.encode(bytes))
    }

    #[test]
    fn test_decode_data_url() {
        let decoded = decode_data_url(&data_url("image/PNG", b"\x89PNG"))
            .unwrap()
            .unwrap();
        assert_eq!(decoded.mime_type, "image/png");
        assert_eq!(decoded.bytes, b"\x89PNG");
        assert_eq!(decoded.extension(), "png");

        assert!(decode_data_url("https://cdn.test/a.png").unwrap().is_none());
        assert!(decode_data_url("data:image/png,plain").is_err());
        assert!(decode_data_url("data:image/png;base64,@@@").is_err());
    }

    #[test]
    fn test_prepare_avatar_classifies_input() {
        let storage = storage(1024);

        assert_eq!(prepare_avatar(None, &storage).unwrap(), None);
        assert_eq!(prepare_avatar(Some("  "), &storage).unwrap(), None);

        let link = prepare_avatar(Some("https://cdn.test/a.png"), &storage).unwrap();
        assert_eq!(
            link,
            Some(AvatarInput::Link("https://cdn.test/a.png".to_string()))
        );
        assert_eq!(link.and_then(AvatarInput::inline_only), None);

        let inline = prepare_avatar(Some(&data_url("image/jpeg", &[1, 2, 3])), &storage).unwrap();
        assert!(matches!(inline, Some(AvatarInput::Inline(_))));
    }

    #[test]
    fn test_oversized_avatar_is_payload_too_large() {
        let storage = storage(4);
        let err = prepare_avatar(Some(&data_url("image/png", &[0; 5])), &storage).unwrap_err();
        assert_eq!(err.status, StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[test]
    fn test_unsupported_type_is_bad_request() {
        let storage = storage(1024);
        let err = prepare_avatar(Some(&data_url("image/tiff", &[1])), &storage).unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_store_avatar_returns_public_url() {
        let dir = std::env::temp_dir().join(format!("schoolhub-avatar-{}", Uuid::new_v4()));
        let storage = LocalFileStorage::new(
            PathBuf::from(&dir),
            "http://localhost:3000/uploads".to_string(),
            1024,
        );
        let avatar = DecodedAvatar {
            mime_type: "image/png".to_string(),
            bytes: vec![1, 2, 3],
        };

        let (key, url) = store_avatar(&storage, Uuid::new_v4(), &avatar).await.unwrap();

        assert!(key.starts_with("avatars/"));
        assert!(key.ends_with(".png"));
        assert_eq!(url, format!("http://localhost:3000/uploads/{}", key));
        assert_eq!(std::fs::read(dir.join(&key)).unwrap(), vec![1, 2, 3]);

        let _ = std::fs::remove_dir_all(dir);
    }
}
