use std::time::Duration;

use sqlx::{postgres::PgPoolOptions, PgPool};
use thiserror::Error;
use tracing::info;

use crate::config::DatabaseConfig;

/// Errors raised while bringing up the connection pool
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Missing configuration: {0}")]
    ConfigMissing(&'static str),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// Pool settings derived from config; kept separate so they can be checked
/// without a live database
fn pool_options(config: &DatabaseConfig) -> PgPoolOptions {
    // Zero disables the corresponding reaper
    let secs = |value: u64| (value > 0).then(|| Duration::from_secs(value));

    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(Duration::from_secs(config.connection_timeout))
        .idle_timeout(secs(config.idle_timeout_secs))
        .max_lifetime(secs(config.max_lifetime_secs))
}

/// Open the pool and make sure the server is reachable before returning it
pub async fn connect_pool(config: &DatabaseConfig) -> Result<PgPool, DatabaseError> {
    let url = config
        .url
        .as_deref()
        .ok_or(DatabaseError::ConfigMissing("DATABASE_URL"))?;

    let pool = pool_options(config).connect(url).await?;
    sqlx::query("SELECT 1").execute(&pool).await?;

    info!(
        max_connections = config.max_connections,
        max_lifetime_secs = config.max_lifetime_secs,
        "database connected successfully"
    );
    Ok(pool)
}

/// Close the pool, waiting for checked-out connections to be returned
pub async fn close_pool(pool: &PgPool) {
    pool.close().await;
    info!("closed database pool");
}
