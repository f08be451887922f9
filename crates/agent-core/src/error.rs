//! Error types for agent-core
//!
//! This is the workspace-wide taxonomy. Crate-local errors (LLM, prompt,
//! news) convert into it at the agent boundary.

use thiserror::Error;

/// Result type alias for agent-core
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for agent operations
#[derive(Error, Debug)]
pub enum Error {
    /// Generic error message
    #[error("{0}")]
    Generic(String),

    /// A headline source could not be retrieved or parsed
    #[error("Fetch failed for source '{source_id}': {detail}")]
    Fetch { source_id: String, detail: String },

    /// The requested tool is not registered
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    /// A tool with this name is already registered
    #[error("Tool '{0}' is already registered")]
    DuplicateTool(String),

    /// A tool's underlying call failed
    #[error("Tool '{tool}' failed: {detail}")]
    ToolInvocation { tool: String, detail: String },

    /// Model output could not be parsed into an action or a final answer
    #[error("Could not parse model output: {0}")]
    Parse(String),

    /// The language model backing service could not be used
    #[error("Model unavailable: {0}")]
    ModelUnavailable(String),

    /// A transition was attempted on a run that already finished or failed
    #[error("Agent run {0} is closed")]
    RunClosed(String),

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Agent initialization failed
    #[error("Agent initialization failed: {0}")]
    InitializationFailed(String),

    /// Agent processing failed
    #[error("Agent processing failed: {0}")]
    ProcessingFailed(String),
}

impl Error {
    /// Build a [`Error::ToolInvocation`] from any displayable cause
    pub fn tool(tool: impl Into<String>, detail: impl std::fmt::Display) -> Self {
        Self::ToolInvocation {
            tool: tool.into(),
            detail: detail.to_string(),
        }
    }

    /// Whether this error should end an agent run instead of being shown to
    /// the model as an observation
    pub fn is_fatal_for_run(&self) -> bool {
        matches!(self, Self::ModelUnavailable(_) | Self::RunClosed(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let err = Error::UnknownTool("SecFilings".to_string());
        assert_eq!(err.to_string(), "Unknown tool: SecFilings");

        let err = Error::tool("SECFilings", "lookup failed");
        assert_eq!(err.to_string(), "Tool 'SECFilings' failed: lookup failed");
    }

    #[test]
    fn test_fatal_classification() {
        assert!(Error::ModelUnavailable("connection refused".into()).is_fatal_for_run());
        assert!(!Error::UnknownTool("x".into()).is_fatal_for_run());
        assert!(!Error::Parse("no action".into()).is_fatal_for_run());
        assert!(!Error::tool("x", "boom").is_fatal_for_run());
    }
}
