//! Rate limiting for the authentication endpoints.
//!
//! Login and registration are limited per client IP with a token bucket:
//! tokens refill at `auth_per_second` and at most `auth_burst_size` can
//! accumulate.
//!
//! - `RATE_LIMIT_AUTH_PER_SECOND` (default 10)
//! - `RATE_LIMIT_AUTH_BURST_SIZE` (default 5)
//!
//! The client IP is taken from `X-Forwarded-For`, `X-Real-Ip` or `Forwarded`
//! before falling back to the peer address, so the server must be started with
//! connect info.

use tower_governor::governor::{GovernorConfig, GovernorConfigBuilder};
use tower_governor::key_extractor::SmartIpKeyExtractor;

use crate::env_or;

pub type AuthGovernorConfig =
    GovernorConfig<SmartIpKeyExtractor, ::governor::middleware::NoOpMiddleware>;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RateLimitConfig {
    pub auth_per_second: u64,
    pub auth_burst_size: u32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            auth_per_second: 10,
            auth_burst_size: 5,
        }
    }
}

impl RateLimitConfig {
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            auth_per_second: env_or("RATE_LIMIT_AUTH_PER_SECOND", defaults.auth_per_second),
            auth_burst_size: env_or("RATE_LIMIT_AUTH_BURST_SIZE", defaults.auth_burst_size),
        }
    }

    /// Governor settings for the auth routes, or `None` when either value is
    /// zero (rate limiting disabled).
    #[must_use]
    pub fn auth_governor_config(&self) -> Option<AuthGovernorConfig> {
        if self.auth_per_second == 0 {
            return None;
        }

        // The builder takes a replenish interval, not a rate.
        GovernorConfigBuilder::default()
            .per_millisecond((1000 / self.auth_per_second).max(1))
            .burst_size(self.auth_burst_size)
            .key_extractor(SmartIpKeyExtractor)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = RateLimitConfig::default();
        assert_eq!(config.auth_per_second, 10);
        assert_eq!(config.auth_burst_size, 5);
        assert!(config.auth_governor_config().is_some());
    }

    #[test]
    fn test_zero_values_disable_limiter() {
        let config = RateLimitConfig {
            auth_per_second: 10,
            auth_burst_size: 0,
        };
        assert!(config.auth_governor_config().is_none());

        let config = RateLimitConfig {
            auth_per_second: 0,
            auth_burst_size: 5,
        };
        assert!(config.auth_governor_config().is_none());
    }
}
