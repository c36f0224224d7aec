//! Value types produced by the aggregator.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Level of a structured log record.
///
/// Levels outside the known set are kept verbatim rather than rejected.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
    Fatal,
    Other(String),
}

impl LogLevel {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
            Self::Fatal => "fatal",
            Self::Other(level) => level,
        }
    }

    /// Whether records of this level are captured as errors.
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error | Self::Fatal)
    }
}

impl From<&str> for LogLevel {
    fn from(level: &str) -> Self {
        match level {
            "debug" => Self::Debug,
            "info" => Self::Info,
            "warn" => Self::Warn,
            "error" => Self::Error,
            "fatal" => Self::Fatal,
            other => Self::Other(other.to_string()),
        }
    }
}

impl From<String> for LogLevel {
    fn from(level: String) -> Self {
        Self::from(level.as_str())
    }
}

impl From<LogLevel> for String {
    fn from(level: LogLevel) -> Self {
        level.as_str().to_string()
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One recognized line of tool output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub level: LogLevel,
    /// Raw message text, unmodified.
    pub message: String,
    /// Opaque timestamp, passed through as received.
    pub timestamp: String,
}

impl LogEntry {
    pub fn new(
        level: impl Into<LogLevel>,
        message: impl Into<String>,
        timestamp: impl Into<String>,
    ) -> Self {
        Self {
            level: level.into(),
            message: message.into(),
            timestamp: timestamp.into(),
        }
    }
}

/// An error or fatal record reported by the tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorRecord {
    /// Always [`ErrorRecord::LEVEL`]; fatal records are folded into errors.
    pub level: String,
    pub message: String,
    pub timestamp: String,
}

impl ErrorRecord {
    pub const LEVEL: &'static str = "error";

    /// Capture an error from an entry, keeping its message untouched.
    pub fn from_entry(entry: &LogEntry) -> Self {
        Self {
            level: Self::LEVEL.to_string(),
            message: entry.message.clone(),
            timestamp: entry.timestamp.clone(),
        }
    }
}

/// Outcome reported for a single resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceStatus {
    Success,
    Failed,
}

impl ResourceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Failed => "failed",
        }
    }

    pub fn parse(token: &str) -> Option<Self> {
        match token {
            "success" => Some(Self::Success),
            "failed" => Some(Self::Failed),
            _ => None,
        }
    }
}

impl fmt::Display for ResourceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Validation outcome for one infrastructure resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceResult {
    pub resource: String,
    pub status: ResourceStatus,
}

impl ResourceResult {
    pub fn new(resource: impl Into<String>, status: ResourceStatus) -> Self {
        Self {
            resource: resource.into(),
            status,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == ResourceStatus::Success
    }
}
