//! PostgreSQL persistence for Cinedex.
//!
//! Models live in [`models`], queries in [`repositories`]. Every repository
//! call takes an [`OpContext`] that bounds how long it may run and lets the
//! caller cancel it.

use sqlx::postgres::PgPoolOptions;

pub mod config;
pub mod context;
pub mod error;
pub mod models;
pub mod repositories;

pub use config::DbConfig;
pub use context::OpContext;
pub use error::StoreError;

pub type DbPool = sqlx::PgPool;

/// Create a connection pool sized and timed by `config`.
pub async fn create_pool(config: &DbConfig) -> Result<DbPool, sqlx::Error> {
    let pool = PgPoolOptions::new()
        .max_connections(config.max_open_conns)
        .min_connections(config.min_idle_conns)
        .idle_timeout(config.max_idle_time)
        .acquire_timeout(config.acquire_timeout)
        .connect(&config.database_url)
        .await?;

    tracing::info!(
        max_open_conns = config.max_open_conns,
        min_idle_conns = config.min_idle_conns,
        "Database connection pool established"
    );
    Ok(pool)
}

/// Verify the database answers a trivial query.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Apply the embedded migrations from `db/migrations`.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("../../db/migrations").run(pool).await?;
    tracing::info!("Database migrations applied");
    Ok(())
}
