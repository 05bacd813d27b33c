//! # LearnHub DB
//!
//! PostgreSQL pool initialization and schema migrations.
//!
//! Both run once at startup. Any failure here is a misconfiguration the
//! service cannot recover from, so these functions panic instead of
//! returning errors.
//!
//! ```ignore
//! use learnhub_db::{init_db_pool, run_migrations};
//!
//! let pool = init_db_pool().await;
//! run_migrations(&pool).await;
//! ```

use std::env;
use std::time::Duration;

use sqlx::postgres::PgPoolOptions;
use tracing::info;

/// Migrations shared by the server, the CLI and `#[sqlx::test]`.
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("../../migrations");

/// Initializes a PostgreSQL connection pool from `DATABASE_URL`.
///
/// # Panics
///
/// Panics if `DATABASE_URL` is not set or the database is unreachable.
pub async fn init_db_pool() -> PgPool {
    let database_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let max_connections = env::var("DATABASE_MAX_CONNECTIONS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(10);

    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(Duration::from_secs(5))
        .connect(&database_url)
        .await
        .expect("Failed to connect to database");

    info!(max_connections, "Database pool ready");
    pool
}

/// Applies pending migrations.
///
/// # Panics
///
/// Panics if a migration fails.
pub async fn run_migrations(pool: &PgPool) {
    MIGRATOR
        .run(pool)
        .await
        .expect("Failed to run database migrations");
    info!("Database migrations applied");
}

pub use sqlx::PgPool;
