//! # SchoolHub Config
//!
//! Configuration structures loaded from environment variables:
//!
//! - [`jwt`]: JWT signing secret and token lifetime
//! - [`cors`]: Allowed browser origins
//! - [`rate_limit`]: Rate limits for the authentication endpoints
//! - [`provisioning`]: Retry budget for student/teacher code generation
//! - [`uploads`]: Avatar upload directory, public URL and size limit
//! - [`server`]: Bind address for the HTTP server
//!
//! ```ignore
//! use schoolhub_config::{JwtConfig, ProvisioningConfig};
//!
//! let jwt_config = JwtConfig::from_env();
//! let provisioning = ProvisioningConfig::from_env();
//! ```

pub mod cors;
pub mod jwt;
pub mod provisioning;
pub mod rate_limit;
pub mod server;
pub mod uploads;

pub use cors::CorsConfig;
pub use jwt::JwtConfig;
pub use provisioning::ProvisioningConfig;
pub use rate_limit::RateLimitConfig;
pub use server::ServerConfig;
pub use uploads::UploadConfig;

/// Reads and parses an environment variable, falling back to `default` when
/// it is unset or malformed.
pub(crate) fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}
