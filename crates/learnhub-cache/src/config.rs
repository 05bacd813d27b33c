//! Redis connection settings.

use std::env;

/// Redis configuration loaded from environment variables.
///
/// - `REDIS_URL`: connection URL (default: `redis://127.0.0.1:6379`)
/// - `CACHE_PREFIX`: prefix for every key (default: `learnhub`)
#[derive(Clone, Debug)]
pub struct CacheConfig {
    pub redis_url: String,
    pub key_prefix: String,
}

impl CacheConfig {
    pub fn from_env() -> Self {
        Self {
            redis_url: env::var("REDIS_URL").unwrap_or_else(|_| "redis://127.0.0.1:6379".into()),
            key_prefix: env::var("CACHE_PREFIX").unwrap_or_else(|_| "learnhub".into()),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            redis_url: "redis://127.0.0.1:6379".into(),
            key_prefix: "learnhub".into(),
        }
    }
}
