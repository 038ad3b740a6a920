//! Raw TOML configuration data types
//!
//! These structs mirror the config file layout. Values that need parsing
//! are kept as strings here and converted with issue reporting, so a typo
//! produces a readable [`ConfigIssue`] instead of a load failure.

mod council;
mod execution;
mod output;
mod provider;

pub use council::FileCouncilConfig;
pub use execution::FileExecutionConfig;
pub use output::FileOutputConfig;
pub use provider::FileProviderConfig;

use council_domain::ConfigIssue;
use serde::{Deserialize, Serialize};

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Who sits on the council
    pub council: FileCouncilConfig,
    /// Deadlines, retries and ranking aggregation
    pub execution: FileExecutionConfig,
    /// OpenRouter-compatible endpoint
    pub provider: FileProviderConfig,
    pub output: FileOutputConfig,
}

impl FileConfig {
    /// Validate the entire configuration, returning all detected issues.
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();
        issues.extend(self.council.validate());
        issues.extend(self.execution.to_params().1);
        issues.extend(self.provider.validate());
        issues.extend(self.output.parse_format().1);
        issues
    }

    /// Whether any issue is severe enough to abort
    pub fn has_errors(&self) -> bool {
        self.validate().iter().any(ConfigIssue::is_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use council_domain::{AggregationMethod, ConfigIssueCode, OutputFormat};
    use std::time::Duration;

    #[test]
    fn test_deserialize_full_config() {
        let toml_str = r#"
[council]
tier = "budget"
models = ["openai/gpt-5.2", "x-ai/grok-4"]
chairman = "openai/gpt-5.2"
dynamic_discovery = false

[execution]
stage_timeout_secs = 45
aggregation = "mean-rank"

[provider]
base_url = "http://localhost:8080/v1"
max_tokens = 1024

[output]
format = "full"
color = false
"#;

        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.council.tier.as_deref(), Some("budget"));
        assert_eq!(config.council.models.len(), 2);
        assert!(!config.council.dynamic_discovery);

        let (params, issues) = config.execution.to_params();
        assert!(issues.is_empty());
        assert_eq!(params.stage_timeout, Duration::from_secs(45));
        assert_eq!(params.aggregation, AggregationMethod::MeanRank);

        assert_eq!(config.provider.base_url, "http://localhost:8080/v1");
        assert_eq!(config.provider.max_tokens, Some(1024));
        assert_eq!(config.output.parse_format().0, Some(OutputFormat::Full));
        assert!(!config.output.color);
        assert!(config.validate().is_empty());
    }

    #[test]
    fn test_deserialize_partial_config() {
        let toml_str = r#"
[council]
chairman = "anthropic/claude-opus-4.5"
"#;

        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(
            config.council.chairman.as_deref(),
            Some("anthropic/claude-opus-4.5")
        );
        // Defaults should apply
        assert!(config.council.tier.is_none());
        assert!(config.council.dynamic_discovery);
        assert_eq!(config.execution, FileExecutionConfig::default());
        assert!(config.output.color);
    }

    #[test]
    fn test_validate_valid_config() {
        let config = FileConfig::default();
        assert!(config.validate().is_empty());
        assert!(!config.has_errors());
    }

    #[test]
    fn test_validate_collects_issues_from_every_section() {
        let toml_str = r#"
[council]
tier = "platinum"

[execution]
stage_timeout_secs = 0

[output]
format = "html"
"#;
        let config: FileConfig = toml::from_str(toml_str).unwrap();
        let codes: Vec<_> = config.validate().iter().map(|i| i.code).collect();
        assert_eq!(
            codes,
            vec![
                ConfigIssueCode::UnknownTier,
                ConfigIssueCode::ZeroTimeout,
                ConfigIssueCode::UnknownOutputFormat,
            ]
        );
        assert!(config.has_errors());
    }
}
