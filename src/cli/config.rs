//! Configuration file
//!
//! ```json
//! { "data_dir": "./data", "log_filter": "recordscope=debug" }
//! ```
//!
//! `log_filter` is optional. `--data-dir` on the command line replaces
//! `data_dir` and makes the file itself optional.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::errors::{CliError, CliResult};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Data directory (required)
    pub data_dir: String,

    /// tracing filter directive (optional, overridden by RECORDSCOPE_LOG)
    #[serde(default)]
    pub log_filter: Option<String>,
}

impl Config {
    /// Load configuration from file
    pub fn load(path: &Path) -> CliResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| CliError::config_error(format!("Failed to read config: {}", e)))?;

        let config: Config = serde_json::from_str(&content)
            .map_err(|e| CliError::config_error(format!("Invalid config JSON: {}", e)))?;

        config.validate()?;

        Ok(config)
    }

    /// Resolves the effective configuration from the file and the
    /// `--data-dir` override.
    pub fn resolve(path: &Path, data_dir: Option<&PathBuf>) -> CliResult<Self> {
        let Some(data_dir) = data_dir else {
            return Self::load(path);
        };

        let mut config = if path.exists() {
            Self::load(path)?
        } else {
            Config {
                data_dir: String::new(),
                log_filter: None,
            }
        };
        config.data_dir = data_dir.to_string_lossy().into_owned();
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> CliResult<()> {
        if self.data_dir.trim().is_empty() {
            return Err(CliError::config_error("data_dir must not be empty"));
        }

        if let Some(filter) = &self.log_filter {
            if filter.trim().is_empty() {
                return Err(CliError::config_error("log_filter must not be empty when set"));
            }
        }

        Ok(())
    }

    /// Get data directory as Path
    pub fn data_path(&self) -> &Path {
        Path::new(&self.data_dir)
    }
}
