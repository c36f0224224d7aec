//! # preflight_runner
//!
//! Launches the Terraform preflight validation tool and streams its output
//! into a [`preflight_log::LogAggregator`] while it runs.
//!
//! # Features
//!
//! - **Process Runner**: spawns the tool locally with timeout handling
//! - **Line Streaming**: every stdout/stderr line is delivered as it is read
//! - **Mock Runner**: scripted responses for testing without the tool
//!
//! # Example
//!
//! ```rust,no_run
//! use preflight_runner::{run_preflight, ProcessRunner, SharedAggregator, ToolConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ToolConfig::new("aztfpreflight").args(["-i", "tfplan.json"]);
//!     let run = run_preflight(&ProcessRunner::new(), &config, SharedAggregator::default()).await?;
//!
//!     println!("{}", run.summary);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod mock;
pub mod preflight;
pub mod process;
pub mod runner;

pub use config::{ToolConfig, DEFAULT_PROGRAM};
pub use error::{RunnerError, RunnerResult};
pub use mock::{CapturedCall, MockResponse, MockRunner, RunnerFailure};
pub use preflight::{run_preflight, PreflightRun, SharedAggregator};
pub use process::ProcessRunner;
pub use runner::{ExecutionResult, LineHandler, OutputLine, OutputStream, ToolRunner};
