//! Error types for the runner module.

use thiserror::Error;

/// Result type alias for runner operations.
pub type RunnerResult<T> = Result<T, RunnerError>;

/// Errors that can occur while running the validation tool.
#[derive(Error, Debug)]
pub enum RunnerError {
    #[error("Tool not found: {0}")]
    ToolNotFound(String),

    #[error("Tool execution failed: {0}")]
    ExecutionFailed(String),

    #[error("Tool timeout after {0} seconds")]
    Timeout(u64),

    #[error("Invalid working directory: {0}")]
    InvalidWorkdir(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
