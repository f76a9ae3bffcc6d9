use std::env;
use std::path::PathBuf;

use crate::env_or;

#[derive(Clone, Debug)]
pub struct UploadConfig {
    /// Directory avatars are written to and served from.
    pub dir: PathBuf,
    /// Public URL prefix matching the `/uploads` static route.
    pub base_url: String,
    pub max_avatar_bytes: usize,
}

impl UploadConfig {
    pub fn from_env() -> Self {
        Self {
            dir: PathBuf::from(
                env::var("UPLOAD_DIR").unwrap_or_else(|_| "public/uploads".to_string()),
            ),
            base_url: env::var("UPLOAD_BASE_URL")
                .unwrap_or_else(|_| "http://localhost:3000/uploads".to_string()),
            max_avatar_bytes: env_or("MAX_AVATAR_BYTES", 5 * 1024 * 1024),
        }
    }
}
