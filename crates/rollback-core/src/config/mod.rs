//! Configuration types for the rollback MCP server.
//!
//! Configuration is loaded from a single YAML file (`rollback.yaml`); every
//! section has defaults so an empty or missing file yields a usable config.
//! The CircleCI token itself never lives in the file, only the name of the
//! environment variable holding it.

pub mod api;
pub mod mcp;
pub mod retry;

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub use api::ApiConfig;
pub use mcp::{McpConfig, Transport};
pub use retry::RetryConfig;

/// Complete configuration loaded from `rollback.yaml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RollbackConfig {
    /// CircleCI API connection settings.
    #[serde(default)]
    pub api: ApiConfig,

    /// Retry/backoff policy for outbound API calls.
    #[serde(default)]
    pub retry: RetryConfig,

    /// MCP server settings.
    #[serde(default)]
    pub mcp: McpConfig,
}

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl RollbackConfig {
    /// Load configuration from a YAML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from YAML content.
    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str(content).map_err(ConfigError::from)
    }

    /// Load from a file if it exists, otherwise fall back to defaults.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if path.exists() {
            Self::from_file(path)
        } else {
            Ok(Self::default())
        }
    }
}
