//! Registrations waiting for their one-time code.
//!
//! Each entry is keyed by email; registering again overwrites it. An entry is
//! evictable `retention` after its code expires. The in-memory backend purges
//! evictable entries on every write and from a periodic sweep; the Redis
//! backend lets the key TTL do it. Nothing here survives a restart of the
//! in-memory backend.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{debug, info, instrument};

use learnhub_auth::UserRole;
use learnhub_cache::RedisCache;

use crate::utils::errors::AppError;

#[derive(Clone, Serialize, Deserialize)]
pub struct PendingRegistration {
    pub name: String,
    pub email: String,
    pub role: UserRole,
    /// Plaintext until verification hashes it into the users table.
    pub password: String,
    pub otp: String,
    pub expires_at: DateTime<Utc>,
}

impl std::fmt::Debug for PendingRegistration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PendingRegistration")
            .field("email", &self.email)
            .field("role", &self.role)
            .field("expires_at", &self.expires_at)
            .finish_non_exhaustive()
    }
}

impl PendingRegistration {
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }

    pub fn matches(&self, otp: &str, now: DateTime<Utc>) -> bool {
        !self.is_expired_at(now) && self.otp == otp
    }
}

#[derive(Clone, Debug)]
pub enum PendingRegistrationStore {
    Memory(MemoryPendingStore),
    Redis(RedisPendingStore),
}

impl PendingRegistrationStore {
    pub fn in_memory(retention: chrono::Duration) -> Self {
        Self::Memory(MemoryPendingStore::new(retention))
    }

    pub fn redis(cache: RedisCache, retention: chrono::Duration) -> Self {
        Self::Redis(RedisPendingStore { cache, retention })
    }

    #[instrument(skip(self))]
    pub async fn put(&self, entry: PendingRegistration) -> Result<(), AppError> {
        match self {
            Self::Memory(store) => {
                store.put(entry).await;
                Ok(())
            }
            Self::Redis(store) => store.put(entry).await,
        }
    }

    #[instrument(skip(self))]
    pub async fn get(&self, email: &str) -> Result<Option<PendingRegistration>, AppError> {
        match self {
            Self::Memory(store) => Ok(store.get(email).await),
            Self::Redis(store) => store.get(email).await,
        }
    }

    #[instrument(skip(self))]
    pub async fn remove(&self, email: &str) -> Result<(), AppError> {
        match self {
            Self::Memory(store) => {
                store.remove(email).await;
                Ok(())
            }
            Self::Redis(store) => store.remove(email).await,
        }
    }

    /// Starts the periodic purge for the in-memory backend. No-op for Redis.
    pub fn spawn_sweeper(&self, every: Duration) {
        if let Self::Memory(store) = self {
            let store = store.clone();
            tokio::spawn(async move {
                let mut interval = tokio::time::interval(every);
                loop {
                    interval.tick().await;
                    let purged = store.purge_evictable(Utc::now()).await;
                    if purged > 0 {
                        info!(purged, "Purged stale pending registrations");
                    }
                }
            });
        }
    }
}

#[derive(Clone, Debug)]
pub struct MemoryPendingStore {
    entries: Arc<RwLock<HashMap<String, PendingRegistration>>>,
    retention: chrono::Duration,
}

impl MemoryPendingStore {
    pub fn new(retention: chrono::Duration) -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
            retention,
        }
    }

    async fn put(&self, entry: PendingRegistration) {
        let now = Utc::now();
        let mut entries = self.entries.write().await;
        let retention = self.retention;
        entries.retain(|_, e| e.expires_at + retention >= now);
        entries.insert(entry.email.clone(), entry);
    }

    async fn get(&self, email: &str) -> Option<PendingRegistration> {
        let now = Utc::now();
        self.entries
            .read()
            .await
            .get(email)
            .filter(|e| e.expires_at + self.retention >= now)
            .cloned()
    }

    async fn remove(&self, email: &str) {
        self.entries.write().await.remove(email);
    }

    /// Drops every entry whose retention window has passed; returns how many.
    pub async fn purge_evictable(&self, now: DateTime<Utc>) -> usize {
        let mut entries = self.entries.write().await;
        let before = entries.len();
        let retention = self.retention;
        entries.retain(|_, e| e.expires_at + retention >= now);
        before - entries.len()
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[derive(Clone, Debug)]
pub struct RedisPendingStore {
    cache: RedisCache,
    retention: chrono::Duration,
}

impl RedisPendingStore {
    fn key(email: &str) -> String {
        format!("pending_registration:{}", email)
    }

    async fn put(&self, entry: PendingRegistration) -> Result<(), AppError> {
        let ttl = (entry.expires_at - Utc::now() + self.retention)
            .to_std()
            .unwrap_or(Duration::from_secs(1));
        self.cache
            .set_with_ttl(&Self::key(&entry.email), &entry, ttl)
            .await?;
        debug!(ttl_secs = ttl.as_secs(), "Stored pending registration");
        Ok(())
    }

    async fn get(&self, email: &str) -> Result<Option<PendingRegistration>, AppError> {
        Ok(self.cache.get(&Self::key(email)).await?)
    }

    async fn remove(&self, email: &str) -> Result<(), AppError> {
        Ok(self.cache.invalidate(&Self::key(email)).await?)
    }
}
