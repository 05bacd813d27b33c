use sqlx::PgPool;
use tracing::info;

use learnhub_cache::{CacheConfig, RedisCache};
use learnhub_db::{init_db_pool, run_migrations};

use crate::config::certificate::CertificateConfig;
use crate::config::cors::CorsConfig;
use crate::config::email::EmailConfig;
use crate::config::jwt::JwtConfig;
use crate::config::rate_limit::RateLimitConfig;
use crate::config::registration::{PendingBackend, RegistrationConfig};
use crate::config::scoring::ScoringConfig;
use crate::modules::auth::pending::PendingRegistrationStore;

#[derive(Clone, Debug)]
pub struct AppState {
    pub db: PgPool,
    pub jwt_config: JwtConfig,
    pub email_config: EmailConfig,
    pub cors_config: CorsConfig,
    pub rate_limit_config: RateLimitConfig,
    pub registration_config: RegistrationConfig,
    pub scoring_config: ScoringConfig,
    pub certificate_config: CertificateConfig,
    pub pending_registrations: PendingRegistrationStore,
}

/// Builds the application state from the environment.
///
/// # Panics
///
/// Panics when the database is unreachable, migrations fail, or the Redis
/// backend is selected for pending registrations and cannot be reached.
pub async fn init_app_state() -> AppState {
    let db = init_db_pool().await;
    run_migrations(&db).await;

    let registration_config = RegistrationConfig::from_env();
    let retention = chrono::Duration::seconds(registration_config.pending_retention_seconds);

    let pending_registrations = match registration_config.pending_backend {
        PendingBackend::Memory => {
            let store = PendingRegistrationStore::in_memory(retention);
            store.spawn_sweeper(std::time::Duration::from_secs(
                registration_config.sweep_interval_seconds.max(1),
            ));
            store
        }
        PendingBackend::Redis => {
            let cache_config = CacheConfig::from_env();
            let cache = RedisCache::new(&cache_config.redis_url, cache_config.key_prefix)
                .await
                .expect("Failed to connect to Redis for pending registrations");
            PendingRegistrationStore::redis(cache, retention)
        }
    };

    info!(backend = ?registration_config.pending_backend, "Pending registration store ready");

    AppState {
        db,
        jwt_config: JwtConfig::from_env(),
        email_config: EmailConfig::from_env(),
        cors_config: CorsConfig::from_env(),
        rate_limit_config: RateLimitConfig::from_env(),
        registration_config,
        scoring_config: ScoringConfig::from_env(),
        certificate_config: CertificateConfig::from_env(),
        pending_registrations,
    }
}
