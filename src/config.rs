use crate::error::{AppError, Result};

pub const SERVICE_NAME: &str = "Sydney Housing Data API";
pub const SERVICE_DESCRIPTION: &str = "API for querying Sydney property sales data";

pub const DATABASE_URL: &str = "sqlite:data/database.sqlite";

/// Page bounds for the `/api/properties`, `/api/quarterly` and `/api/analytics` lists.
pub mod list_page {
    pub const DEFAULT_LIMIT: i64 = 100;
    pub const MAX_LIMIT: i64 = 1000;
}

/// Page bounds for suburb autocomplete.
pub mod search_page {
    pub const DEFAULT_LIMIT: i64 = 20;
    pub const MAX_LIMIT: i64 = 100;
}

#[derive(Debug, Clone)]
pub struct Config {
    /// sqlx connection string for the read-only store (DATABASE_URL)
    pub database_url: String,
    pub api_host: String,
    pub api_port: u16,
    pub log_level: String,
    /// Upper bound on pooled connections (DB_MAX_CONNECTIONS)
    pub db_max_connections: u32,
    /// Seconds a request waits for a pooled connection (DB_ACQUIRE_TIMEOUT_SECS)
    pub db_acquire_timeout_secs: u64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let db_max_connections = positive::<u32>(
            "DB_MAX_CONNECTIONS",
            &std::env::var("DB_MAX_CONNECTIONS").unwrap_or_else(|_| "8".to_string()),
        )?;
        let db_acquire_timeout_secs = positive::<u64>(
            "DB_ACQUIRE_TIMEOUT_SECS",
            &std::env::var("DB_ACQUIRE_TIMEOUT_SECS").unwrap_or_else(|_| "5".to_string()),
        )?;

        Ok(Self {
            database_url: normalize_database_url(
                &std::env::var("DATABASE_URL").unwrap_or_else(|_| DATABASE_URL.to_string()),
            ),
            api_host: std::env::var("API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            api_port: std::env::var("API_PORT")
                .unwrap_or_else(|_| "8000".to_string())
                .parse::<u16>()
                .map_err(|_| AppError::Config("API_PORT must be a valid port number".to_string()))?,
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            db_max_connections,
            db_acquire_timeout_secs,
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.api_host, self.api_port)
    }
}

/// Parses a pool setting that must be at least 1.
fn positive<T>(name: &str, raw: &str) -> Result<T>
where
    T: std::str::FromStr + PartialOrd + From<u8>,
{
    raw.trim()
        .parse::<T>()
        .ok()
        .filter(|n| *n >= T::from(1))
        .ok_or_else(|| AppError::Config(format!("{name} must be a positive integer")))
}

/// Accepts SQLAlchemy-style `sqlite:///path` URLs as well as sqlx's `sqlite:path`.
/// Three slashes denote a relative path, four an absolute one.
pub fn normalize_database_url(url: &str) -> String {
    match url.strip_prefix("sqlite:///") {
        Some(path) => format!("sqlite:{path}"),
        None => url.to_string(),
    }
}
