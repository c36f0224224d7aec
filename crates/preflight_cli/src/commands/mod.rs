//! CLI command definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub mod parse;
pub mod run;

/// preflight - Terraform preflight validation summaries
#[derive(Parser)]
#[command(name = "preflight")]
#[command(version, about = "Run Terraform preflight validation and summarize its output")]
#[command(long_about = r#"
Summarizes the structured log output of a Terraform preflight validation
tool: per-resource outcomes and reported errors.

COMMANDS:
  parse   → Summarize captured tool output from a file or stdin
  run     → Run the validation tool and summarize its output live

EXIT CODES:
  0 - Validation passed
  1 - General error
  2 - Invalid arguments or configuration
  3 - Validation failure
  4 - Tool error (not found, timeout, spawn failure)
"#)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to a config file (default: ./preflight.yaml if present)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Summarize captured validation output
    Parse(parse::ParseArgs),

    /// Run the validation tool and summarize its output
    Run(run::RunArgs),
}

/// Result of a command that completed without an operational error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Passed,
    Failed,
}

impl Outcome {
    pub fn from_passed(passed: bool) -> Self {
        if passed {
            Self::Passed
        } else {
            Self::Failed
        }
    }
}
