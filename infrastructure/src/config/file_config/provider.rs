//! Provider connection settings from TOML (`[provider]` section)

use crate::openrouter::client::{DEFAULT_API_KEY_ENV, DEFAULT_BASE_URL, OpenRouterConfig};
use crate::openrouter::error::Result;
use council_domain::{ConfigIssue, ConfigIssueCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Raw provider configuration from TOML
///
/// The API key itself is never stored in the file; `api_key_env` names the
/// environment variable to read it from.
///
/// ```toml
/// [provider]
/// base_url = "https://openrouter.ai/api/v1"
/// api_key_env = "OPENROUTER_API_KEY"
/// max_tokens = 4096
/// temperature = 0.7
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileProviderConfig {
    pub base_url: String,
    pub api_key_env: String,
    /// Sent as the `X-Title` header
    pub app_name: String,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
    pub request_timeout_secs: u64,
}

impl Default for FileProviderConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key_env: DEFAULT_API_KEY_ENV.to_string(),
            app_name: "llm-council".to_string(),
            max_tokens: Some(4096),
            temperature: None,
            request_timeout_secs: 120,
        }
    }
}

impl FileProviderConfig {
    /// Build the client configuration, reading the key from `api_key_env`
    pub fn to_openrouter_config(&self) -> Result<OpenRouterConfig> {
        let mut config = OpenRouterConfig::from_env(&self.api_key_env)?.with_base_url(&self.base_url);
        config.app_name = self.app_name.clone();
        config.max_tokens = self.max_tokens;
        config.temperature = self.temperature;
        if self.request_timeout_secs > 0 {
            config.request_timeout = Duration::from_secs(self.request_timeout_secs);
        }
        Ok(config)
    }

    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();
        if self.request_timeout_secs == 0 {
            issues.push(ConfigIssue::warning(
                ConfigIssueCode::ZeroTimeout,
                "provider.request_timeout_secs is 0, using the client default",
            ));
        }
        issues
    }
}
