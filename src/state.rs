use std::fmt;
use std::sync::Arc;

use schoolhub_config::{CorsConfig, JwtConfig, ProvisioningConfig, RateLimitConfig, UploadConfig};
use schoolhub_core::file_storage::{FileStorage, LocalFileStorage};
use schoolhub_db::{PgPool, init_db_pool};

#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub jwt_config: JwtConfig,
    pub cors_config: CorsConfig,
    pub rate_limit_config: RateLimitConfig,
    pub provisioning: ProvisioningConfig,
    pub upload_config: UploadConfig,
    pub storage: Arc<dyn FileStorage>,
}

impl AppState {
    /// Builds the state around an existing pool, reading everything else
    /// from the environment.
    pub fn from_env(db: PgPool) -> Self {
        let upload_config = UploadConfig::from_env();
        let storage = Arc::new(LocalFileStorage::new(
            upload_config.dir.clone(),
            upload_config.base_url.clone(),
            upload_config.max_avatar_bytes,
        ));

        Self {
            db,
            jwt_config: JwtConfig::from_env(),
            cors_config: CorsConfig::from_env(),
            rate_limit_config: RateLimitConfig::from_env(),
            provisioning: ProvisioningConfig::from_env(),
            upload_config,
            storage,
        }
    }
}

impl fmt::Debug for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState")
            .field("cors_config", &self.cors_config)
            .field("rate_limit_config", &self.rate_limit_config)
            .field("provisioning", &self.provisioning)
            .field("upload_config", &self.upload_config)
            .finish_non_exhaustive()
    }
}

pub async fn init_app_state() -> Result<AppState, sqlx::Error> {
    let db = init_db_pool().await?;
    Ok(AppState::from_env(db))
}
