//! Database connection management

use std::time::Duration;

use sqlx::pool::PoolConnection;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::{Pool, Postgres};

use crate::config::DatabaseConfig;
use crate::utils::errors::UserStoreError;

pub type DatabasePool = Pool<Postgres>;

/// Name reported to the server in `pg_stat_activity`
const APPLICATION_NAME: &str = "bot-user-store";

/// Connection options for `config`.
///
/// Text is exchanged as UTF-8 so every script users write in round-trips intact.
pub fn connect_options(config: &DatabaseConfig) -> PgConnectOptions {
    PgConnectOptions::new()
        .host(&config.host)
        .port(config.port)
        .username(&config.user)
        .password(&config.password)
        .database(&config.name)
        .application_name(APPLICATION_NAME)
        .options([("client_encoding", "UTF8")])
}

/// Create a new database connection pool.
///
/// The pool connects lazily, so an unreachable server is reported by the
/// first operation that needs a connection rather than here.
pub fn create_pool(config: &DatabaseConfig) -> DatabasePool {
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
        .connect_lazy_with(connect_options(config));

    tracing::info!(
        host = %config.host,
        port = config.port,
        database = %config.name,
        "Database connection pool created"
    );
    pool
}

/// Take one connection out of the pool for the duration of an operation.
///
/// The returned guard goes back to the pool when dropped.
pub async fn acquire(pool: &DatabasePool) -> Result<PoolConnection<Postgres>, UserStoreError> {
    pool.acquire().await.map_err(|e| {
        tracing::error!(error = %e, "Failed to acquire database connection");
        UserStoreError::Connection(e)
    })
}

/// Check database health
pub async fn health_check(pool: &DatabasePool) -> Result<(), UserStoreError> {
    let mut conn = acquire(pool).await?;

    sqlx::query("SELECT 1")
        .execute(&mut *conn)
        .await
        .map_err(UserStoreError::from_statement)?;

    Ok(())
}
