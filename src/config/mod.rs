//! Configuration management for CardWizz Auth

use anyhow::{bail, Context, Result};
use std::env;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server host
    pub http_host: String,
    /// HTTP server port
    pub http_port: u16,
    /// User store configuration
    pub store: StoreConfig,
    /// Telemetry configuration
    pub telemetry: TelemetryConfig,
}

/// Which document store backs the user collection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    /// Process-local store, contents are lost on restart
    Memory,
    /// MySQL `documents` table
    MySql,
}

impl std::str::FromStr for StoreBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "memory" => Ok(StoreBackend::Memory),
            "mysql" => Ok(StoreBackend::MySql),
            other => bail!("Unknown STORE_BACKEND '{}', expected 'memory' or 'mysql'", other),
        }
    }
}

#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub backend: StoreBackend,
    /// Collection holding user documents
    pub users_collection: String,
    /// Required when `backend` is `MySql`
    pub database: Option<DatabaseConfig>,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
}

#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    /// "json" or "pretty"
    pub log_format: String,
    pub metrics_enabled: bool,
    pub service_name: String,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_format: "pretty".to_string(),
            metrics_enabled: false,
            service_name: "cardwizz-auth".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let backend: StoreBackend = env::var("STORE_BACKEND")
            .unwrap_or_else(|_| "memory".to_string())
            .parse()?;

        let database = match backend {
            StoreBackend::Memory => None,
            StoreBackend::MySql => Some(DatabaseConfig {
                url: env::var("DATABASE_URL")
                    .context("DATABASE_URL is required when STORE_BACKEND=mysql")?,
                max_connections: env::var("DATABASE_MAX_CONNECTIONS")
                    .unwrap_or_else(|_| "10".to_string())
                    .parse()
                    .unwrap_or(10),
                min_connections: env::var("DATABASE_MIN_CONNECTIONS")
                    .unwrap_or_else(|_| "2".to_string())
                    .parse()
                    .unwrap_or(2),
            }),
        };

        Ok(Self {
            http_host: env::var("HTTP_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            http_port: env::var("HTTP_PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .context("Invalid HTTP_PORT")?,
            store: StoreConfig {
                backend,
                users_collection: env::var("USERS_COLLECTION")
                    .unwrap_or_else(|_| "users".to_string()),
                database,
            },
            telemetry: TelemetryConfig {
                log_format: env::var("LOG_FORMAT").unwrap_or_else(|_| "pretty".to_string()),
                metrics_enabled: env::var("METRICS_ENABLED")
                    .map(|s| s.to_lowercase() == "true")
                    .unwrap_or(false),
                service_name: env::var("SERVICE_NAME")
                    .unwrap_or_else(|_| "cardwizz-auth".to_string()),
            },
        })
    }

    /// Get HTTP server address
    pub fn http_addr(&self) -> String {
        format!("{}:{}", self.http_host, self.http_port)
    }

    /// Database settings, failing when the MySQL backend was not configured
    pub fn database(&self) -> Result<&DatabaseConfig> {
        self.store
            .database
            .as_ref()
            .context("DATABASE_URL is required for the mysql store backend")
    }
}
