//! Configuration loading and representation.
//!
//! Everything comes from environment variables:
//!
//! - `STOCKYARD_BIND_ADDR`: listen address (default `0.0.0.0:8080`)
//! - `USE_PERSISTENT_STORES`: `true` selects Postgres (default `false`)
//! - `DATABASE_URL`: required when persistent stores are enabled

use std::net::SocketAddr;

use thiserror::Error;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageBackend {
    InMemory,
    Postgres { database_url: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub storage: StorageBackend,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid STOCKYARD_BIND_ADDR '{0}'")]
    InvalidBindAddr(String),

    #[error("invalid boolean for {key}: '{value}'")]
    InvalidBool { key: &'static str, value: String },

    #[error("DATABASE_URL must be set when USE_PERSISTENT_STORES=true")]
    MissingDatabaseUrl,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the config from an arbitrary variable lookup (tests pass a map).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let raw_addr = lookup("STOCKYARD_BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = raw_addr
            .parse::<SocketAddr>()
            .map_err(|_| ConfigError::InvalidBindAddr(raw_addr.clone()))?;

        let persistent = match lookup("USE_PERSISTENT_STORES") {
            None => false,
            Some(value) => value.trim().parse::<bool>().map_err(|_| ConfigError::InvalidBool {
                key: "USE_PERSISTENT_STORES",
                value,
            })?,
        };

        let storage = if persistent {
            let database_url = lookup("DATABASE_URL")
                .filter(|url| !url.trim().is_empty())
                .ok_or(ConfigError::MissingDatabaseUrl)?;
            StorageBackend::Postgres { database_url }
        } else {
            StorageBackend::InMemory
        };

        Ok(Self { bind_addr, storage })
    }
}
