//! LLM Gateway port
//!
//! Defines the interface for communicating with LLM providers.

use async_trait::async_trait;
use council_domain::{FailureKind, Model, ParticipantFailure};
use thiserror::Error;

/// Errors that can occur during LLM gateway operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },

    #[error("Rate limited: {0}")]
    RateLimited(String),

    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Malformed response: {0}")]
    Malformed(String),

    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    #[error("Timeout")]
    Timeout,

    #[error("Other error: {0}")]
    Other(String),
}

impl GatewayError {
    /// Transient failures (connection reset, 5xx) are worth one retry;
    /// everything else will fail the same way again.
    pub fn is_transient(&self) -> bool {
        matches!(self, GatewayError::Connection(_) | GatewayError::Server { .. })
    }

    pub fn failure_kind(&self) -> FailureKind {
        match self {
            GatewayError::Connection(_) => FailureKind::Transport,
            GatewayError::Server { .. } => FailureKind::Server,
            GatewayError::RateLimited(_) => FailureKind::RateLimited,
            GatewayError::Authentication(_) => FailureKind::Authentication,
            GatewayError::InvalidRequest(_) | GatewayError::Malformed(_) => FailureKind::Malformed,
            GatewayError::ModelNotAvailable(_) => FailureKind::ModelUnavailable,
            GatewayError::Timeout => FailureKind::Timeout,
            GatewayError::Other(_) => FailureKind::Other,
        }
    }

    /// The non-fatal record kept for the participant
    pub fn to_failure(&self) -> ParticipantFailure {
        ParticipantFailure::new(self.failure_kind(), self.to_string())
    }
}

/// Gateway for LLM communication
///
/// This port defines how the application layer communicates with LLM providers.
/// Implementations (adapters) live in the infrastructure layer and own the
/// generation parameters (max tokens, temperature) they send with each request.
#[async_trait]
pub trait LlmGateway: Send + Sync {
    /// Create a new session with a system prompt
    async fn create_session_with_system_prompt(
        &self,
        model: &Model,
        system_prompt: &str,
    ) -> Result<Box<dyn LlmSession>, GatewayError>;
}

/// An active LLM session
#[async_trait]
pub trait LlmSession: Send + Sync {
    /// Get the model used by this session
    fn model(&self) -> &Model;

    /// Send a message and get a response
    async fn send(&self, content: &str) -> Result<String, GatewayError>;
}
