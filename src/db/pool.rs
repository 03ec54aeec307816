use anyhow::{ bail, Context, Result };
use sqlx::postgres::{ PgPool, PgPoolOptions };
use std::env;
use std::time::Duration;

use crate::utils::logging::log_activity;

// Development fallbacks, used only outside production
const DEFAULT_DB_HOST: &str = "localhost";
const DEFAULT_DB_PORT: &str = "5432";
const DEFAULT_DB_NAME: &str = "lightbnb";
const DEFAULT_DB_USER: &str = "vagrant";
const DEFAULT_DB_PASSWORD: &str = "123";

/// Database configuration for the rental store
#[derive(Debug, Clone)]
pub struct DbConfig {
    pub connection_string: String,
    pub max_connections: u32,
    pub connect_timeout: Duration,
}

impl DbConfig {
    /// Create a new DbConfig from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable source
    ///
    /// `DATABASE_URL` wins when present. Otherwise the URL is assembled from
    /// `DB_HOST`, `DB_PORT`, `DB_NAME`, `DB_USER` and `DB_PASSWORD`, falling
    /// back to development defaults unless `APP_ENV` is `production`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self> where F: Fn(&str) -> Option<String> {
        let production = lookup("APP_ENV").map_or(false, |value| value == "production");

        let connection_string = match lookup("DATABASE_URL") {
            Some(url) => url,
            None => {
                let part = |key: &str, default: &str| -> Result<String> {
                    match lookup(key) {
                        Some(value) => Ok(value),
                        None if production => bail!("{} environment variable not set", key),
                        None => Ok(default.to_string()),
                    }
                };

                format!(
                    "postgres://{}:{}@{}:{}/{}",
                    part("DB_USER", DEFAULT_DB_USER)?,
                    part("DB_PASSWORD", DEFAULT_DB_PASSWORD)?,
                    part("DB_HOST", DEFAULT_DB_HOST)?,
                    part("DB_PORT", DEFAULT_DB_PORT)?,
                    part("DB_NAME", DEFAULT_DB_NAME)?
                )
            }
        };

        // Default to 5 connections, but allow configuration
        let max_connections = lookup("DATABASE_MAX_CONNECTIONS")
            .unwrap_or_else(|| "5".to_string())
            .parse::<u32>()
            .context("Invalid DATABASE_MAX_CONNECTIONS value")?;

        // Default timeout of 30 seconds
        let connect_timeout_secs = lookup("DATABASE_CONNECT_TIMEOUT")
            .unwrap_or_else(|| "30".to_string())
            .parse::<u64>()
            .context("Invalid DATABASE_CONNECT_TIMEOUT value")?;

        Ok(Self {
            connection_string,
            max_connections,
            connect_timeout: Duration::from_secs(connect_timeout_secs),
        })
    }
}

/// Database connection pool shared by every store operation
#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    /// Create a new database connection pool
    pub async fn connect(config: DbConfig) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(config.connect_timeout)
            .connect(&config.connection_string).await
            .context("Failed to connect to database")?;

        // Verify connection by running a simple query
        sqlx::query("SELECT 1").execute(&pool).await.context("Failed to execute test query")?;

        log_activity("Database", "Connected", Some(&format!("max_connections={}", config.max_connections)));

        Ok(Self { pool })
    }

    /// Get a reference to the inner connection pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}
