pub mod analytics;
pub mod filter;
pub mod models;
pub mod properties;
pub mod quarterly;
pub mod query;
pub mod stats;

use std::str::FromStr;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;

use crate::config::Config;
use crate::error::Result;

/// Opens the store read-only with an explicitly sized pool.
pub async fn connect(cfg: &Config) -> Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(&cfg.database_url)?.read_only(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(cfg.db_max_connections)
        .acquire_timeout(Duration::from_secs(cfg.db_acquire_timeout_secs))
        .connect_with(options)
        .await?;
    Ok(pool)
}

/// Cheap round trip used by the health endpoint.
pub async fn ping(pool: &SqlitePool) -> Result<()> {
    sqlx::query_scalar::<_, i64>("SELECT 1").fetch_one(pool).await?;
    Ok(())
}
