//! Output configuration from TOML (`[output]` section)

use council_domain::{ConfigIssue, ConfigIssueCode, OutputFormat};
use serde::{Deserialize, Serialize};

/// Raw output configuration from TOML
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileOutputConfig {
    /// Output format: "synthesis", "full" or "json"; unset lets the CLI decide
    pub format: Option<String>,
    /// Enable colored terminal output
    pub color: bool,
}

impl Default for FileOutputConfig {
    fn default() -> Self {
        Self {
            format: None,
            color: true,
        }
    }
}

impl FileOutputConfig {
    /// Parse `format`, reporting an unknown value instead of failing the load
    pub fn parse_format(&self) -> (Option<OutputFormat>, Vec<ConfigIssue>) {
        match self.format.as_deref().map(str::parse::<OutputFormat>) {
            None => (None, Vec::new()),
            Some(Ok(format)) => (Some(format), Vec::new()),
            Some(Err(e)) => (
                None,
                vec![ConfigIssue::warning(
                    ConfigIssueCode::UnknownOutputFormat,
                    format!("output.format: {}, falling back to the default", e),
                )],
            ),
        }
    }
}
