//! Deliberation execution settings from TOML (`[execution]` section)

use council_application::{DeliberationParams, MAX_RETRIES};
use council_domain::{AggregationMethod, ConfigIssue, ConfigIssueCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Raw execution configuration from TOML
///
/// # Example
///
/// ```toml
/// [execution]
/// stage_timeout_secs = 90
/// max_retries = 0
/// aggregation = "mean-rank"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileExecutionConfig {
    /// Per-stage deadline in seconds
    pub stage_timeout_secs: u64,
    /// Retries after a transient failure
    pub max_retries: u32,
    /// Ranking aggregation: "borda" or "mean-rank"
    pub aggregation: String,
}

impl Default for FileExecutionConfig {
    fn default() -> Self {
        Self {
            stage_timeout_secs: 120,
            max_retries: MAX_RETRIES,
            aggregation: AggregationMethod::default().as_str().to_string(),
        }
    }
}

impl FileExecutionConfig {
    /// Convert to [`DeliberationParams`], falling back to defaults for
    /// invalid values and reporting each as an issue.
    pub fn to_params(&self) -> (DeliberationParams, Vec<ConfigIssue>) {
        let mut issues = Vec::new();
        let mut params = DeliberationParams::default();

        if self.stage_timeout_secs == 0 {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::ZeroTimeout,
                "execution.stage_timeout_secs must be greater than 0",
            ));
        } else {
            params = params.with_stage_timeout(Duration::from_secs(self.stage_timeout_secs));
        }

        if self.max_retries > MAX_RETRIES {
            issues.push(ConfigIssue::warning(
                ConfigIssueCode::RetriesClamped,
                format!(
                    "execution.max_retries: {} exceeds the limit, using {}",
                    self.max_retries, MAX_RETRIES
                ),
            ));
        }
        params = params.with_max_retries(self.max_retries);

        match self.aggregation.parse::<AggregationMethod>() {
            Ok(method) => params = params.with_aggregation(method),
            Err(e) => issues.push(ConfigIssue::error(
                ConfigIssueCode::UnknownAggregation,
                format!("execution.aggregation: {}", e),
            )),
        }

        (params, issues)
    }
}
