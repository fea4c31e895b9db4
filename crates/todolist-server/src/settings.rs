//! Server settings, read once from the environment at startup
//!
//! Recognised variables: `APP_HOST`, `APP_PORT`, `STORAGE_BACKEND`
//! (`memory` | `sqlite`), `DB_NAME` and `DB_SERVER`. A `.env` file in the
//! working directory is loaded first when present.

use serde::Deserialize;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read configuration: {0}")]
    Source(#[from] config::ConfigError),

    #[error("Invalid STORAGE_BACKEND '{0}' (expected 'memory' or 'sqlite')")]
    InvalidBackend(String),

    #[error("DB_NAME is required when STORAGE_BACKEND=sqlite")]
    MissingDatabaseName,
}

/// Which `TodoStore` implementation to run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Memory,
    Sqlite,
}

impl FromStr for StorageBackend {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_lowercase().as_str() {
            "memory" | "in_memory" | "inmemory" => Ok(Self::Memory),
            "sqlite" | "sql" | "relational" => Ok(Self::Sqlite),
            _ => Err(ConfigError::InvalidBackend(value.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageConfig {
    Memory,
    Sqlite { database_path: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub bind_address: String,
    pub storage: StorageConfig,
}

#[derive(Debug, Deserialize)]
struct RawConfig {
    app_host: String,
    app_port: u16,
    storage_backend: String,
    db_name: Option<String>,
    db_server: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_environment(config::Environment::default())
    }

    fn from_environment(env: config::Environment) -> Result<Self, ConfigError> {
        let raw: RawConfig = config::Config::builder()
            .set_default("app_host", "0.0.0.0")?
            .set_default("app_port", 8080)?
            .set_default("storage_backend", "memory")?
            .add_source(env.try_parsing(true))
            .build()?
            .try_deserialize()?;

        let storage = match raw.storage_backend.parse()? {
            StorageBackend::Memory => StorageConfig::Memory,
            StorageBackend::Sqlite => {
                let name = raw
                    .db_name
                    .filter(|n| !n.is_empty())
                    .ok_or(ConfigError::MissingDatabaseName)?;
                let database_path = match raw.db_server.filter(|s| !s.is_empty()) {
                    Some(dir) => Path::new(&dir).join(&name).to_string_lossy().to_string(),
                    None => name,
                };
                StorageConfig::Sqlite { database_path }
            }
        };

        Ok(Config {
            bind_address: format!("{}:{}", raw.app_host, raw.app_port),
            storage,
        })
    }
}
