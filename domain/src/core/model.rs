//! Model value object representing a provider-qualified LLM identifier

use super::error::DomainError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A provider-qualified model identifier (Value Object)
///
/// Identifiers follow the OpenRouter convention `vendor/name`
/// (e.g. `openai/gpt-5.2`). A bare name without a vendor prefix is
/// accepted as well; it simply has no [`vendor`](Model::vendor).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Model(String);

impl Model {
    /// Create a model identifier, rejecting empty or whitespace-only names
    pub fn new(id: impl Into<String>) -> Result<Self, DomainError> {
        let id = id.into();
        let trimmed = id.trim();
        if trimmed.is_empty() {
            return Err(DomainError::InvalidModel(
                "model name cannot be empty".to_string(),
            ));
        }
        if trimmed.contains(char::is_whitespace) {
            return Err(DomainError::InvalidModel(format!(
                "model name cannot contain whitespace: {}",
                trimmed
            )));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Build an identifier from a built-in table entry known to be well-formed
    pub(crate) fn known(id: &str) -> Self {
        Self(id.to_string())
    }

    /// Get the full identifier
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Vendor prefix (e.g. `openai/gpt-5.2` -> `openai`)
    pub fn vendor(&self) -> Option<&str> {
        self.0.split_once('/').map(|(vendor, _)| vendor)
    }

    /// Name without the vendor prefix (e.g. `openai/gpt-5.2` -> `gpt-5.2`)
    pub fn short_name(&self) -> &str {
        self.0.rsplit('/').next().unwrap_or(&self.0)
    }
}

impl std::fmt::Display for Model {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for Model {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Model::new(s)
    }
}

impl Serialize for Model {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Model {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Model::new(s).map_err(serde::de::Error::custom)
    }
}
