//! Cost tiers
//!
//! A tier selects a fixed council lineup unless dynamic discovery replaces it.

use super::discovery::VendorPreference;
use crate::core::error::DomainError;
use crate::core::model::Model;
use serde::{Deserialize, Serialize};

/// Cost tier selecting which models sit on the council
///
/// Rough per-query cost: budget ~$0.05, balanced ~$0.15, premium ~$1.50.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CostTier {
    Budget,
    #[default]
    Balanced,
    Premium,
}

/// A tier's council members and chairman
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierLineup {
    pub council: Vec<Model>,
    pub chairman: Model,
}

impl CostTier {
    pub fn all() -> [CostTier; 3] {
        [CostTier::Budget, CostTier::Balanced, CostTier::Premium]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CostTier::Budget => "budget",
            CostTier::Balanced => "balanced",
            CostTier::Premium => "premium",
        }
    }

    /// Built-in lineup used when discovery is disabled or unavailable
    pub fn static_lineup(&self) -> TierLineup {
        let (council, chairman): (&[&str], &str) = match self {
            CostTier::Budget => (
                &[
                    "openai/gpt-4o-mini",
                    "anthropic/claude-3-5-sonnet",
                    "google/gemini-2.0-flash-001",
                    "x-ai/grok-4.1-fast",
                ],
                "google/gemini-2.0-flash-001",
            ),
            CostTier::Balanced => (
                &[
                    "openai/gpt-5.2",
                    "anthropic/claude-sonnet-4.5",
                    "google/gemini-3-pro-preview",
                    "x-ai/grok-4.1-fast",
                ],
                "google/gemini-3-pro-preview",
            ),
            CostTier::Premium => (
                &[
                    "openai/gpt-5.2-pro",
                    "anthropic/claude-opus-4.5",
                    "google/gemini-3-pro-preview",
                    "x-ai/grok-4",
                ],
                "google/gemini-3-pro-preview",
            ),
        };

        TierLineup {
            council: council.iter().map(|id| Model::known(id)).collect(),
            chairman: Model::known(chairman),
        }
    }

    /// Per-vendor include/exclude filters applied to a discovered catalog
    pub fn vendor_preferences(&self) -> &'static [VendorPreference] {
        match self {
            CostTier::Budget => BUDGET_PREFERENCES,
            CostTier::Balanced => BALANCED_PREFERENCES,
            CostTier::Premium => PREMIUM_PREFERENCES,
        }
    }
}

const BUDGET_PREFERENCES: &[VendorPreference] = &[
    VendorPreference::new("openai", &["gpt-4o-mini", "gpt-5-mini"], &["search", "audio"]),
    VendorPreference::new("anthropic", &["claude-sonnet"], &["opus"]),
    VendorPreference::new(
        "google",
        &["gemini-3-flash", "gemini-2.5-flash"],
        &["lite", "image", "nano", "exp"],
    ),
    VendorPreference::new("x-ai", &["grok-4"], &["mini", "code"]),
];

const BALANCED_PREFERENCES: &[VendorPreference] = &[
    VendorPreference::new(
        "openai",
        &["gpt-5.2", "gpt-4o"],
        &[
            "mini", "codex", "image", "safeguard", "pro", "extended", "search", "audio", "chat",
        ],
    ),
    VendorPreference::new("anthropic", &["claude-sonnet"], &["opus"]),
    VendorPreference::new("google", &["gemini-3-pro", "gemini-4"], &["flash", "image", "nano"]),
    VendorPreference::new("x-ai", &["grok-4", "grok-5"], &["mini", "code"]),
];

const PREMIUM_PREFERENCES: &[VendorPreference] = &[
    VendorPreference::new(
        "openai",
        &["gpt-5.2-pro", "gpt-6"],
        &["mini", "codex", "image", "safeguard", "chat"],
    ),
    VendorPreference::new("anthropic", &["claude-opus"], &[]),
    VendorPreference::new("google", &["gemini-3-pro", "gemini-4"], &["flash", "image", "nano"]),
    VendorPreference::new("x-ai", &["grok-4", "grok-5"], &["mini", "fast"]),
];

impl std::fmt::Display for CostTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for CostTier {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "budget" => Ok(CostTier::Budget),
            "balanced" => Ok(CostTier::Balanced),
            "premium" => Ok(CostTier::Premium),
            other => Err(DomainError::UnknownTier(other.to_string())),
        }
    }
}
