//! Error types for news operations

use thiserror::Error;

/// News, filing and sentiment errors
#[derive(Debug, Error)]
pub enum NewsError {
    /// A headline source could not be retrieved or parsed
    #[error("Fetch failed for source '{source_id}': {detail}")]
    Fetch { source_id: String, detail: String },

    /// An upstream API answered with an error status or an unexpected body
    #[error("{provider} API error: {detail}")]
    Api { provider: String, detail: String },

    /// No company matched the given name or ticker
    #[error("No company found for '{0}'")]
    CompanyNotFound(String),

    /// The company has no filing of the requested form
    #[error("No {form} filing found for {company}")]
    FilingNotFound { company: String, form: String },

    /// The text contained no fenced JSON block
    #[error("No JSON found in the text")]
    NoJson,

    /// Network or HTTP error
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Prompt rendering failed
    #[error("Prompt error: {0}")]
    Prompt(#[from] agent_prompt::PromptError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl NewsError {
    pub(crate) fn fetch(source_id: impl Into<String>, detail: impl std::fmt::Display) -> Self {
        Self::Fetch {
            source_id: source_id.into(),
            detail: detail.to_string(),
        }
    }

    pub(crate) fn api(provider: impl Into<String>, detail: impl std::fmt::Display) -> Self {
        Self::Api {
            provider: provider.into(),
            detail: detail.to_string(),
        }
    }
}

/// Result type alias for news operations
pub type Result<T> = std::result::Result<T, NewsError>;

impl From<NewsError> for agent_core::Error {
    fn from(err: NewsError) -> Self {
        match err {
            NewsError::Fetch { source_id, detail } => {
                agent_core::Error::Fetch { source_id, detail }
            }
            NewsError::Config(msg) => agent_core::Error::Configuration(msg),
            other => agent_core::Error::ProcessingFailed(other.to_string()),
        }
    }
}
