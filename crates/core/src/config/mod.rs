//! Application configuration with layered loading.
//!
//! This module provides configuration management using figment for layered
//! configuration loading from multiple sources:
//!
//! 1. Environment variables (CINDEX_*)
//! 2. TOML config file (if CINDEX_CONFIG_FILE set)
//! 3. Built-in defaults

use std::path::PathBuf;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

use crate::index::BackendKind;

mod validation;

pub use validation::ConfigError;

/// Application configuration with layered loading.
///
/// Loading precedence (highest wins):
/// 1. Environment variables (CINDEX_*)
/// 2. TOML config file (if CINDEX_CONFIG_FILE set)
/// 3. Built-in defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Directory holding the index files.
    ///
    /// Set via CINDEX_INDEX_DIR environment variable.
    /// Ignored by the memory backend.
    #[serde(default = "default_index_dir")]
    pub index_dir: PathBuf,

    /// Storage backend: `memory`, `csv` or `sqlite`.
    ///
    /// Set via CINDEX_BACKEND environment variable.
    #[serde(default)]
    pub backend: BackendKind,
}

fn default_index_dir() -> PathBuf {
    PathBuf::from("./.cindex")
}

impl Default for AppConfig {
    fn default() -> Self {
        Self { index_dir: default_index_dir(), backend: BackendKind::default() }
    }
}

impl AppConfig {
    /// Load configuration from all sources with layered precedence.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Configuration file cannot be read
    /// - Environment variables cannot be parsed
    /// - Validation fails after loading
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Ok(config_path) = std::env::var("CINDEX_CONFIG_FILE") {
            figment = figment.merge(Toml::file(&config_path));
        }

        figment = figment.merge(
            Env::prefixed("CINDEX_")
                .ignore(&["CONFIG_FILE"])
                .map(|key| key.as_str().to_lowercase().into())
                .split("__"),
        );

        Self::extract(&figment)
    }

    fn extract(figment: &Figment) -> Result<Self, ConfigError> {
        let config: Self = figment.extract().map_err(|e| ConfigError::LoadFailed(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Directory to hand to the registry, if the backend uses one.
    pub fn storage_dir(&self) -> Option<PathBuf> {
        self.backend.is_file_backed().then(|| self.index_dir.clone())
    }
}
