//! Error Types

use thiserror::Error;

/// Result type alias for dispatch operations
pub type Result<T> = std::result::Result<T, DispatchError>;

/// Dispatch error types
///
/// Only `Upstream`, `Timeout` and intent resolution abort a route. Tool
/// failures are contained to the failing call's result payload by the
/// registry and never surface through this type during batch execution.
#[derive(Error, Debug)]
pub enum DispatchError {
    /// AI backend call failed
    #[error("AI backend error: {0}")]
    Upstream(String),

    /// AI backend call exceeded the configured deadline
    #[error("AI call timed out after {secs}s")]
    Timeout { secs: u64 },

    /// Intent classification produced no usable intent
    #[error("could not resolve user intent")]
    IntentUnresolved,

    /// Tool not found in registry
    #[error("tool not found: {0}")]
    ToolNotFound(String),

    /// Tool execution failed
    #[error("tool execution error: {0}")]
    ToolExecution(String),

    /// Tool rejected its arguments
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Knowledge retrieval path unavailable or failed
    #[error("knowledge service error: {0}")]
    Knowledge(String),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Other/unknown error
    #[error("{0}")]
    Other(String),
}

impl DispatchError {
    /// Whether the failure is a request-for-clarification rather than a
    /// service fault. Clarifications keep the HTTP 200 envelope.
    pub fn is_clarification(&self) -> bool {
        matches!(self, DispatchError::IntentUnresolved)
    }

    /// Whether the failure originated in the AI backend
    pub fn is_upstream(&self) -> bool {
        matches!(
            self,
            DispatchError::Upstream(_) | DispatchError::Timeout { .. }
        )
    }

    /// Convert to a user-friendly envelope message
    pub fn user_message(&self) -> String {
        match self {
            DispatchError::Upstream(_) => {
                "The AI service is currently unavailable. Please try again.".into()
            }
            DispatchError::Timeout { .. } => {
                "The AI service took too long to respond. Please try again.".into()
            }
            // Clarification copy shown to the user when classification fails.
            DispatchError::IntentUnresolved => "意图识别失败，请明确您的需求".into(),
            DispatchError::ToolNotFound(name) => {
                format!("The tool '{}' is not available.", name)
            }
            DispatchError::ToolExecution(msg) => format!("Tool error: {}", msg),
            DispatchError::InvalidArgument(msg) => format!("Invalid tool input: {}", msg),
            DispatchError::Knowledge(_) => {
                "The knowledge service is currently unavailable.".into()
            }
            _ => "An unexpected error occurred.".into(),
        }
    }
}

impl From<anyhow::Error> for DispatchError {
    fn from(err: anyhow::Error) -> Self {
        DispatchError::Other(err.to_string())
    }
}
