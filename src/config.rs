//! Configuration management for the task server.
//!
//! Configuration can be set via environment variables:
//! - `HOST` - Optional. Server host. Defaults to `127.0.0.1`.
//! - `PORT` - Optional. Server port. Defaults to `3000`.
//! - `STATIC_DIR` - Optional. Directory holding the browser client. Defaults to `public`.
//! - `TASK_STORE` - Optional. Storage backend: `sqlite` (default) or `memory`.
//!   Unknown values log a warning and fall back to `sqlite`.
//! - `DATABASE_PATH` - Optional. SQLite database file. When unset the SQLite
//!   backend runs in memory and nothing survives a restart.

use std::path::PathBuf;
use thiserror::Error;

use crate::task_store::TaskStoreType;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

/// Storage configuration.
#[derive(Debug, Clone, Default)]
pub struct StoreConfig {
    /// Backend selection
    pub kind: TaskStoreType,

    /// SQLite file; `None` keeps the database in memory
    pub database_path: Option<PathBuf>,
}

/// Server configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server host
    pub host: String,

    /// Server port
    pub port: u16,

    /// Browser client assets, served from `/`
    pub static_dir: PathBuf,

    /// Task storage configuration
    pub store: StoreConfig,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if `PORT` is not a valid port number.
    pub fn from_env() -> Result<Self, ConfigError> {
        let host = std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());

        let port = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse()
            .map_err(|e| ConfigError::InvalidValue("PORT".to_string(), format!("{}", e)))?;

        let static_dir = std::env::var("STATIC_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("public"));

        let store = StoreConfig {
            kind: std::env::var("TASK_STORE")
                .map(|v| store_kind(&v))
                .unwrap_or_default(),
            database_path: std::env::var("DATABASE_PATH")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from),
        };

        Ok(Self {
            host,
            port,
            static_dir,
            store,
        })
    }

    /// Create a config with custom values (useful for testing).
    pub fn new(static_dir: PathBuf) -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
            static_dir,
            store: StoreConfig::default(),
        }
    }

    /// Address the listener binds to.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Resolve a `TASK_STORE` value, warning when it names no backend.
fn store_kind(value: &str) -> TaskStoreType {
    TaskStoreType::parse(value).unwrap_or_else(|| {
        let fallback = TaskStoreType::default();
        tracing::warn!(
            "Unknown TASK_STORE value {:?}; falling back to {}",
            value,
            fallback.as_str()
        );
        fallback
    })
}
