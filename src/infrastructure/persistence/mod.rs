//! PostgreSQL repository implementations.
//!
//! Concrete implementations of domain repository traits using SQLx with
//! runtime-bound queries.
//!
//! # Repositories
//!
//! - [`PgProductRepository`] - Product storage, filtered listing, image replacement
//! - [`PgReviewRepository`] - Review creation

pub mod pg_product_repository;
pub mod pg_review_repository;

pub use pg_product_repository::PgProductRepository;
pub use pg_review_repository::PgReviewRepository;

use crate::config::Config;
use anyhow::Result;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::time::Duration;

/// Opens a connection pool using the pool settings from [`Config`].
///
/// # Errors
///
/// Returns an error if the database is unreachable.
pub async fn connect_pool(config: &Config) -> Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(config.db_connect_timeout))
        .idle_timeout(Duration::from_secs(config.db_idle_timeout))
        .max_lifetime(Duration::from_secs(config.db_max_lifetime))
        .connect(&config.database_url)
        .await?;

    tracing::info!("Connected to database");
    Ok(pool)
}

/// Applies pending schema migrations from the embedded `migrations/` directory.
///
/// # Errors
///
/// Returns an error if a migration fails or the migration history is
/// inconsistent.
pub async fn run_migrations(pool: &PgPool) -> Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    tracing::info!("Migrations applied");
    Ok(())
}
