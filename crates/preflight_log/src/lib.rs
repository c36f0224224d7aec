//! # preflight_log
//!
//! Aggregation of Terraform preflight validation output.
//!
//! The validation tool writes one JSON record per line (`level`, `msg`,
//! `time`), interleaved with plain-text noise. This crate turns that stream
//! into a structured summary: per-resource outcomes and collected errors.
//!
//! ## Features
//!
//! - Tolerant line parsing: malformed or incomplete lines are skipped
//! - Resource outcome extraction (`<resource>: success|failed`)
//! - Error and fatal record capture with original messages preserved
//! - Chunked and reader-based streaming ingestion
//!
//! ## Example
//!
//! ```rust
//! use preflight_log::LogAggregator;
//!
//! let mut aggregator = LogAggregator::new();
//! aggregator.parse_output(concat!(
//!     r#"{"level":"info","msg":"azurerm_resource_group.main: success","time":"t1"}"#, "\n",
//!     "some plain text\n",
//!     r#"{"level":"error","msg":"quota exceeded","time":"t2"}"#,
//! ));
//!
//! let summary = aggregator.summary();
//! assert_eq!(summary.successful_resources, 1);
//! assert!(aggregator.has_errors());
//! ```

pub mod aggregator;
pub mod entry;
pub mod error;
pub mod patterns;
pub mod stream;
pub mod summary;

pub use aggregator::LogAggregator;
pub use entry::{ErrorRecord, LogEntry, LogLevel, ResourceResult, ResourceStatus};
pub use error::{LogError, LogResult};
pub use stream::LineBuffer;
pub use summary::Summary;
