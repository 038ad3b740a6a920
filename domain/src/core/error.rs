//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("No participants configured for the council")]
    NoParticipants,

    #[error("No chairman could be designated")]
    NoChairman,

    #[error("Unknown cost tier: {0} (valid: budget, balanced, premium)")]
    UnknownTier(String),

    #[error("Invalid question: {0}")]
    InvalidQuestion(String),

    #[error("Invalid model: {0}")]
    InvalidModel(String),

    #[error("Unknown aggregation method: {0} (valid: borda, mean-rank)")]
    UnknownAggregation(String),

    #[error("Unknown output format: {0} (valid: synthesis, full, json)")]
    UnknownOutputFormat(String),
}

impl DomainError {
    /// Whether this error stems from council configuration rather than input
    pub fn is_configuration(&self) -> bool {
        !matches!(self, DomainError::InvalidQuestion(_))
    }
}
