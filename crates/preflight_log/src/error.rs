//! Error types for log ingestion.
//!
//! Parsing itself never fails; malformed lines are skipped. Only reading the
//! underlying source can produce an error.

use thiserror::Error;

/// Result type alias for log ingestion.
pub type LogResult<T> = Result<T, LogError>;

/// Errors that can occur while ingesting log output.
#[derive(Error, Debug)]
pub enum LogError {
    #[error("Failed to read log output: {0}")]
    Io(#[from] std::io::Error),
}
