//! Configuration management
//!
//! All configuration is explicit and passed into the coordinators at
//! invocation time; there is no process-wide mutable session state. Values
//! come from the environment (with `.env` support) and fall back to the
//! defaults below.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default database URL for local development.
pub const DEFAULT_DATABASE_URL: &str = "postgresql://localhost/clouddb";

/// Default maximum database connections in the pool.
pub const DEFAULT_DATABASE_MAX_CONNECTIONS: u32 = 5;

/// Default database connection timeout in seconds.
pub const DEFAULT_DATABASE_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Default mount point of the historical-files container (bulk mode).
pub const DEFAULT_HISTORICAL_DIR: &str = "/mnt/historical";

/// Default mount point of the new-arrivals container (incremental mode).
pub const DEFAULT_INGESTION_DIR: &str = "/mnt/ingestion";

/// Top-level ingestion configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub database: DatabaseConfig,
    pub storage: StorageConfig,
}

/// Database connection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub connect_timeout_secs: u64,
}

/// Mounted object-storage directories the pipeline reads from
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub historical_dir: PathBuf,
    pub ingestion_dir: PathBuf,
}

impl Config {
    /// Load configuration from the environment and defaults
    ///
    /// Environment variables:
    /// - `DATABASE_URL`: PostgreSQL connection string (credentials included;
    ///   the pipeline never sees raw secrets beyond this handle)
    /// - `DATABASE_MAX_CONNECTIONS`, `DATABASE_CONNECT_TIMEOUT_SECS`
    /// - `CLOUDTRACK_HISTORICAL_DIR`: directory scanned by bulk mode
    /// - `CLOUDTRACK_INGESTION_DIR`: directory incremental files arrive in
    pub fn load() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let config = Config {
            database: DatabaseConfig {
                url: std::env::var("DATABASE_URL")
                    .unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string()),
                max_connections: std::env::var("DATABASE_MAX_CONNECTIONS")
                    .ok()
                    .and_then(|value| value.parse().ok())
                    .unwrap_or(DEFAULT_DATABASE_MAX_CONNECTIONS),
                connect_timeout_secs: std::env::var("DATABASE_CONNECT_TIMEOUT_SECS")
                    .ok()
                    .and_then(|value| value.parse().ok())
                    .unwrap_or(DEFAULT_DATABASE_CONNECT_TIMEOUT_SECS),
            },
            storage: StorageConfig {
                historical_dir: std::env::var("CLOUDTRACK_HISTORICAL_DIR")
                    .map(PathBuf::from)
                    .unwrap_or_else(|_| PathBuf::from(DEFAULT_HISTORICAL_DIR)),
                ingestion_dir: std::env::var("CLOUDTRACK_INGESTION_DIR")
                    .map(PathBuf::from)
                    .unwrap_or_else(|_| PathBuf::from(DEFAULT_INGESTION_DIR)),
            },
        };

        Ok(config)
    }
}
