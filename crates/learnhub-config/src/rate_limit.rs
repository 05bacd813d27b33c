//! Rate limiting for the authentication endpoints.
//!
//! Registration, login and password reset all trigger password hashing or
//! outbound mail, so they sit behind a per-client token bucket.
//!
//! - `RATE_LIMIT_ENABLED`: toggle the limiter (default: true)
//! - `RATE_LIMIT_AUTH_PER_SECOND`: seconds needed to replenish one token (default: 10)
//! - `RATE_LIMIT_AUTH_BURST_SIZE`: bucket size (default: 5)
//!
//! Clients are keyed by `x-forwarded-for` / `x-real-ip` / `forwarded` when a
//! proxy sets them, and by the peer address otherwise.

use governor::middleware::NoOpMiddleware;
use tower_governor::governor::{GovernorConfig, GovernorConfigBuilder};
use tower_governor::key_extractor::SmartIpKeyExtractor;

use crate::{env_flag, env_or};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RateLimitConfig {
    pub enabled: bool,
    pub auth_per_second: u64,
    pub auth_burst_size: u32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: true,
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
            enabled: env_flag("RATE_LIMIT_ENABLED", defaults.enabled),
            auth_per_second: env_or("RATE_LIMIT_AUTH_PER_SECOND", defaults.auth_per_second),
            auth_burst_size: env_or("RATE_LIMIT_AUTH_BURST_SIZE", defaults.auth_burst_size),
        }
    }

    #[must_use]
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }

    /// Builds the governor config for the authentication routes.
    ///
    /// Zero values are clamped to one, so the builder always succeeds.
    #[must_use]
    pub fn auth_governor_config(&self) -> GovernorConfig<SmartIpKeyExtractor, NoOpMiddleware> {
        GovernorConfigBuilder::default()
            .per_second(self.auth_per_second.max(1))
            .burst_size(self.auth_burst_size.max(1))
            .key_extractor(SmartIpKeyExtractor)
            .finish()
            .expect("non-zero period and burst always build a governor config")
    }
}
