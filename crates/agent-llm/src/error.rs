//! Error types for LLM operations

use thiserror::Error;

/// Result type for LLM operations
pub type Result<T> = std::result::Result<T, LLMError>;

/// Errors that can occur during LLM operations
#[derive(Error, Debug)]
pub enum LLMError {
    /// The backing service could not be reached (connection refused, timeout)
    #[error("Model service unreachable: {0}")]
    Unavailable(String),

    /// API request failed
    #[error("API request failed: {0}")]
    RequestFailed(String),

    /// Invalid API key or authentication failed
    #[error("Invalid API key or authentication failed")]
    AuthenticationFailed,

    /// Rate limit exceeded
    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    /// Invalid request
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Model not found
    #[error("Model not found: {0}")]
    ModelNotFound(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// HTTP error other than connectivity
    #[error("HTTP error: {0}")]
    HttpError(reqwest::Error),

    /// Unexpected response format
    #[error("Unexpected response format: {0}")]
    UnexpectedResponse(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigurationError(String),
}

impl From<reqwest::Error> for LLMError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_connect() || err.is_timeout() {
            LLMError::Unavailable(err.to_string())
        } else {
            LLMError::HttpError(err)
        }
    }
}

/// Every model failure ends the agent run that hit it
impl From<LLMError> for agent_core::Error {
    fn from(err: LLMError) -> Self {
        agent_core::Error::ModelUnavailable(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_converts_to_model_unavailable() {
        let err: agent_core::Error = LLMError::Unavailable("connection refused".into()).into();
        assert!(matches!(err, agent_core::Error::ModelUnavailable(ref m) if m.contains("connection refused")));

        let err: agent_core::Error = LLMError::AuthenticationFailed.into();
        assert!(err.is_fatal_for_run());
    }
}
