//! Orchestration domain entities

use serde::{Deserialize, Serialize};

/// Stage of a deliberation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    /// Stage 1 - every contributor answers independently
    Collect,
    /// Stage 2 - contributors rank each other's anonymized answers
    Review,
    /// Stage 3 - the chairman synthesizes a final answer
    Synthesis,
}

impl Stage {
    pub fn all() -> [Stage; 3] {
        [Stage::Collect, Stage::Review, Stage::Synthesis]
    }

    pub fn as_str(&self) -> &str {
        match self {
            Stage::Collect => "collect",
            Stage::Review => "review",
            Stage::Synthesis => "synthesis",
        }
    }

    /// 1-based stage number
    pub fn number(&self) -> u8 {
        match self {
            Stage::Collect => 1,
            Stage::Review => 2,
            Stage::Synthesis => 3,
        }
    }

    pub fn display_name(&self) -> &str {
        match self {
            Stage::Collect => "Individual Responses",
            Stage::Review => "Peer Ranking",
            Stage::Synthesis => "Chairman Synthesis",
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Stage {}: {}", self.number(), self.display_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_display() {
        assert_eq!(Stage::Review.to_string(), "Stage 2: Peer Ranking");
        assert_eq!(Stage::all().map(|s| s.number()), [1, 2, 3]);
    }

    #[test]
    fn test_stage_serde() {
        assert_eq!(serde_json::to_string(&Stage::Collect).unwrap(), "\"collect\"");
    }
}
