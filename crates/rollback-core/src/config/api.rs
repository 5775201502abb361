//! CircleCI API connection configuration.

use serde::{Deserialize, Serialize};

use super::ConfigError;

/// Connection settings for the CircleCI v2 API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the API.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Name of the environment variable holding the API token. The token is
    /// never stored in the config file itself.
    #[serde(default = "default_token_env")]
    pub token_env: String,

    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            token_env: default_token_env(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl ApiConfig {
    /// Resolve the API token from the configured environment variable.
    pub fn resolve_token(&self) -> Result<String, ConfigError> {
        std::env::var(&self.token_env).map_err(|_| {
            ConfigError::Config(format!(
                "API token not found: set the {} environment variable",
                self.token_env
            ))
        })
    }
}

fn default_base_url() -> String {
    "https://circleci.com/api/v2".to_string()
}

fn default_token_env() -> String {
    "CIRCLECI_TOKEN".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}
