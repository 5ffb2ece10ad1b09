use crate::core::{ReflectqlError, Result};
use crate::db::connection::EngineOptions;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Top-level configuration structure parsed from a TOML file.
#[derive(Debug, Deserialize)]
pub struct Config {
    pub database: DatabaseConfig,
}

/// Connection-related configuration.
#[derive(Debug, Deserialize)]
pub struct DatabaseConfig {
    /// Connection target: `:memory:`, a file path, or a dialect URL
    pub target: String,
    /// Recycle the connection after this many seconds; omit for the
    /// default, 0 to disable
    pub recycle_secs: Option<u64>,
}

impl Config {
    /// Derives connection options from the configuration.
    pub fn engine_options(&self) -> EngineOptions {
        match self.database.recycle_secs {
            Some(0) => EngineOptions {
                recycle_after: None,
            },
            Some(secs) => EngineOptions {
                recycle_after: Some(Duration::from_secs(secs)),
            },
            None => EngineOptions::default(),
        }
    }
}

/// Loads configuration from a TOML file at the given path.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config> {
    let content = fs::read_to_string(path)?;
    toml::from_str(&content).map_err(|e| ReflectqlError::Config(e.to_string()))
}
