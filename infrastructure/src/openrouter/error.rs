//! Error types for the OpenRouter adapter

use council_application::{CatalogError, GatewayError};
use thiserror::Error;

/// Result type alias for OpenRouter operations
pub type Result<T> = std::result::Result<T, OpenRouterError>;

/// Errors that can occur when talking to an OpenRouter-compatible API
#[derive(Error, Debug)]
pub enum OpenRouterError {
    #[error("API key not found: set the {0} environment variable")]
    MissingApiKey(String),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Request failed with status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("API error (code {code}): {message}")]
    Api { code: u16, message: String },

    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),
}

impl OpenRouterError {
    /// HTTP-like status code, when one is known
    pub fn status(&self) -> Option<u16> {
        match self {
            OpenRouterError::Status { status, .. } => Some(*status),
            OpenRouterError::Api { code, .. } => Some(*code),
            OpenRouterError::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

impl From<OpenRouterError> for GatewayError {
    fn from(error: OpenRouterError) -> Self {
        let message = error.to_string();
        match &error {
            OpenRouterError::MissingApiKey(_) => GatewayError::Authentication(message),
            OpenRouterError::Http(e) if e.is_timeout() => GatewayError::Timeout,
            OpenRouterError::Http(e) if e.is_decode() => GatewayError::Malformed(message),
            OpenRouterError::Http(e) if e.status().is_none() => GatewayError::Connection(message),
            OpenRouterError::UnexpectedResponse(_) => GatewayError::Malformed(message),
            _ => match error.status() {
                Some(401) | Some(403) => GatewayError::Authentication(message),
                Some(402) | Some(429) => GatewayError::RateLimited(message),
                Some(404) => GatewayError::ModelNotAvailable(message),
                Some(408) => GatewayError::Timeout,
                Some(status) if status >= 500 => GatewayError::Server { status, message },
                Some(400..=499) => GatewayError::InvalidRequest(message),
                _ => GatewayError::Other(message),
            },
        }
    }
}

impl From<OpenRouterError> for CatalogError {
    fn from(error: OpenRouterError) -> Self {
        match error {
            OpenRouterError::UnexpectedResponse(msg) => CatalogError::Malformed(msg),
            OpenRouterError::Http(e) if e.is_decode() => CatalogError::Malformed(e.to_string()),
            other => CatalogError::Unavailable(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status(status: u16) -> GatewayError {
        OpenRouterError::Status {
            status,
            body: "{}".to_string(),
        }
        .into()
    }

    #[test]
    fn test_status_mapping() {
        assert!(matches!(status(401), GatewayError::Authentication(_)));
        assert!(matches!(status(429), GatewayError::RateLimited(_)));
        assert!(matches!(status(404), GatewayError::ModelNotAvailable(_)));
        assert!(matches!(status(400), GatewayError::InvalidRequest(_)));
        assert!(matches!(status(503), GatewayError::Server { status: 503, .. }));
        assert!(status(502).is_transient());
        assert!(!status(429).is_transient());
    }

    #[test]
    fn test_api_error_in_body_uses_code() {
        let error: GatewayError = OpenRouterError::Api {
            code: 502,
            message: "upstream".to_string(),
        }
        .into();
        assert!(error.is_transient());
    }

    #[test]
    fn test_missing_key_is_authentication() {
        let error: GatewayError = OpenRouterError::MissingApiKey("OPENROUTER_API_KEY".to_string()).into();
        assert!(matches!(error, GatewayError::Authentication(_)));
    }
}
