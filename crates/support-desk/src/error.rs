//! Error Types for the Support Desk Toolkit

use dispatch_core::DispatchError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, DeskError>;

#[derive(Error, Debug)]
pub enum DeskError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("division by zero is not allowed")]
    DivisionByZero,

    #[error("calculation resulted in invalid number")]
    InvalidResult,

    #[error("order backend error: {0}")]
    Backend(String),

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Map desk failures into the core taxonomy at the tool boundary. The
/// registry's batch semantics then contain them to the failing call.
impl From<DeskError> for DispatchError {
    fn from(err: DeskError) -> Self {
        match err {
            DeskError::InvalidArgument(msg) => DispatchError::InvalidArgument(msg),
            other => DispatchError::ToolExecution(other.to_string()),
        }
    }
}
