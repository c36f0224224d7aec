//! Tool runner trait and types.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::ToolConfig;
use crate::error::RunnerResult;

/// Result of one tool execution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionResult {
    /// Exit code from the process (-1 if killed by a signal)
    pub exit_code: i64,
    /// Captured stdout
    pub stdout: String,
    /// Captured stderr
    pub stderr: String,
    /// Execution start time
    pub started_at: DateTime<Utc>,
    /// Execution end time
    pub finished_at: DateTime<Utc>,
    /// Duration in milliseconds
    pub duration_ms: u64,
}

impl ExecutionResult {
    /// Check if execution was successful (exit code 0).
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }

    /// Get combined output (stdout + stderr).
    pub fn combined_output(&self) -> String {
        if self.stdout.is_empty() {
            self.stderr.clone()
        } else if self.stderr.is_empty() {
            self.stdout.clone()
        } else {
            format!("{}\n{}", self.stdout, self.stderr)
        }
    }
}

/// Output stream a line was read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputStream {
    Stdout,
    Stderr,
}

impl std::fmt::Display for OutputStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Stdout => write!(f, "stdout"),
            Self::Stderr => write!(f, "stderr"),
        }
    }
}

/// One line of tool output, delivered as it is read.
#[derive(Debug, Clone)]
pub struct OutputLine {
    pub timestamp: DateTime<Utc>,
    pub stream: OutputStream,
    pub text: String,
}

impl OutputLine {
    pub fn new(stream: OutputStream, text: impl Into<String>) -> Self {
        Self {
            timestamp: Utc::now(),
            stream,
            text: text.into(),
        }
    }
}

/// Callback invoked for every output line.
pub type LineHandler = Arc<dyn Fn(OutputLine) + Send + Sync>;

/// Runs the external validation tool.
#[async_trait]
pub trait ToolRunner: Send + Sync {
    /// Check whether the program can be launched.
    async fn is_available(&self, program: &str) -> bool;

    /// Run the tool to completion, streaming lines to `handler`.
    async fn run(
        &self,
        config: &ToolConfig,
        handler: Option<LineHandler>,
    ) -> RunnerResult<ExecutionResult>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(stdout: &str, stderr: &str, exit_code: i64) -> ExecutionResult {
        ExecutionResult {
            exit_code,
            stdout: stdout.to_string(),
            stderr: stderr.to_string(),
            started_at: Utc::now(),
            finished_at: Utc::now(),
            duration_ms: 0,
        }
    }

    #[test]
    fn test_combined_output() {
        assert_eq!(result("out", "", 0).combined_output(), "out");
        assert_eq!(result("", "err", 1).combined_output(), "err");
        assert_eq!(result("out", "err", 1).combined_output(), "out\nerr");
    }

    #[test]
    fn test_success() {
        assert!(result("", "", 0).success());
        assert!(!result("", "", 2).success());
    }
}
