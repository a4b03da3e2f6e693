use std::str::FromStr;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use thiserror::Error;
use tracing::info;

use crate::config::DatabaseConfig;

/// Errors from the store layer
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Invalid database URL '{0}'")]
    InvalidDatabaseUrl(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

const SCHEMA: &str = r#"
    CREATE TABLE IF NOT EXISTS census_tracts (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        census_tract TEXT NOT NULL UNIQUE,
        inclusion_score REAL NOT NULL,
        growth_score REAL NOT NULL,
        economy_score REAL NOT NULL,
        community_score REAL NOT NULL
    )
"#;

/// Open the pool described by `config` and make sure the schema exists.
pub async fn connect(config: &DatabaseConfig) -> Result<SqlitePool, DatabaseError> {
    if !config.url.starts_with("sqlite:") {
        return Err(DatabaseError::InvalidDatabaseUrl(config.url.clone()));
    }

    let options = SqliteConnectOptions::from_str(&config.url)
        .map_err(|_| DatabaseError::InvalidDatabaseUrl(config.url.clone()))?
        .create_if_missing(true);

    let mut pool_options = SqlitePoolOptions::new()
        .acquire_timeout(Duration::from_secs(config.connection_timeout));

    // Every in-memory connection is its own database, so pin exactly one
    // connection for the life of the pool.
    pool_options = if is_in_memory(&config.url) {
        pool_options
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
    } else {
        pool_options.max_connections(config.max_connections.max(1))
    };

    let pool = pool_options.connect_with(options).await?;
    migrate(&pool).await?;

    info!("Connected to store at {}", config.url);
    Ok(pool)
}

/// Create the census tract table if it is missing.
pub async fn migrate(pool: &SqlitePool) -> Result<(), DatabaseError> {
    sqlx::query(SCHEMA).execute(pool).await?;
    Ok(())
}

/// Pings the pool to ensure connectivity
pub async fn health_check(pool: &SqlitePool) -> Result<(), DatabaseError> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

fn is_in_memory(url: &str) -> bool {
    url.contains(":memory:") || url.contains("mode=memory")
}
