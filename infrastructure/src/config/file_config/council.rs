//! Council membership configuration from TOML (`[council]` section)
//!
//! ```toml
//! [council]
//! tier = "budget"
//! models = ["openai/gpt-5.2", "x-ai/grok-4"]
//! chairman = "google/gemini-3-pro-preview"
//! fallback_chairmen = ["openai/gpt-5.2"]
//! dynamic_discovery = false
//! ```

use council_application::CouncilSelection;
use council_domain::{ConfigIssue, ConfigIssueCode, CostTier, Model};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileCouncilConfig {
    /// Cost tier: "budget", "balanced" or "premium"
    pub tier: Option<String>,
    /// Explicit participants; overrides the tier lineup when non-empty
    pub models: Vec<String>,
    pub chairman: Option<String>,
    pub fallback_chairmen: Vec<String>,
    /// Refresh tier lineups from the provider's model catalog
    pub dynamic_discovery: bool,
}

impl Default for FileCouncilConfig {
    fn default() -> Self {
        Self {
            tier: None,
            models: Vec::new(),
            chairman: None,
            fallback_chairmen: Vec::new(),
            dynamic_discovery: true,
        }
    }
}

impl FileCouncilConfig {
    pub fn to_selection(&self) -> CouncilSelection {
        CouncilSelection {
            tier: self.tier.clone(),
            models: self.models.clone(),
            chairman: self.chairman.clone(),
            fallback_chairmen: self.fallback_chairmen.clone(),
            dynamic_discovery: self.dynamic_discovery,
        }
    }

    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();

        if let Some(tier) = &self.tier
            && tier.parse::<CostTier>().is_err()
        {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::UnknownTier,
                format!(
                    "council.tier: unknown tier '{}' (valid: budget, balanced, premium)",
                    tier
                ),
            ));
        }

        check_model_names("council.models", &self.models, &mut issues);
        check_model_names("council.fallback_chairmen", &self.fallback_chairmen, &mut issues);
        if let Some(chairman) = &self.chairman {
            check_model_names("council.chairman", std::slice::from_ref(chairman), &mut issues);
        }

        issues
    }
}

fn check_model_names(field: &str, names: &[String], issues: &mut Vec<ConfigIssue>) {
    for name in names {
        if name.trim().is_empty() {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::EmptyModelName,
                format!("{}: model name cannot be empty", field),
            ));
        } else if let Err(e) = Model::new(name.as_str()) {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::InvalidModelName,
                format!("{}: {}", field, e),
            ));
        }
    }
}
