//! # LearnHub Cache
//!
//! Redis-backed storage for short-lived, expiring values such as pending
//! registrations.
//!
//! ```ignore
//! use learnhub_cache::{CacheConfig, RedisCache};
//!
//! let config = CacheConfig::from_env();
//! let cache = RedisCache::new(&config.redis_url, config.key_prefix.clone()).await?;
//! cache.set_with_ttl("pending:a@b.c", &entry, Duration::from_secs(900)).await?;
//! let entry: Option<Entry> = cache.get("pending:a@b.c").await?;
//! ```

pub mod config;
pub mod redis;

pub use config::CacheConfig;
pub use redis::{CacheError, RedisCache};
