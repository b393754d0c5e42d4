//! Configuration validation rules.
//!
//! This module provides validation logic for `AppConfig` values
//! after they have been loaded from environment, files, or defaults.

use crate::config::AppConfig;
use thiserror::Error;

/// Configuration validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    LoadFailed(String),

    #[error("invalid configuration: {field} - {reason}")]
    Invalid { field: String, reason: String },

    #[error("missing required configuration: {field} ({hint})")]
    Missing { field: String, hint: String },
}

impl AppConfig {
    /// Validate configuration values after loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Missing` if a file-backed backend has no
    /// `index_dir`, and `ConfigError::Invalid` if `index_dir` names an
    /// existing regular file.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.backend.is_file_backed() {
            return Ok(());
        }

        if self.index_dir.as_os_str().is_empty() {
            return Err(ConfigError::Missing {
                field: "index_dir".into(),
                hint: format!("the {} backend stores files; set CINDEX_INDEX_DIR", self.backend),
            });
        }

        if self.index_dir.is_file() {
            return Err(ConfigError::Invalid {
                field: "index_dir".into(),
                reason: format!("{} is a file, expected a directory", self.index_dir.display()),
            });
        }

        Ok(())
    }
}
