//! preflight CLI - Main entry point.
//!
//! Exit codes:
//! - 0: Validation passed
//! - 1: General error
//! - 2: Invalid arguments or configuration
//! - 3: Validation failure
//! - 4: Tool error

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod commands;
mod config;
mod report;

use commands::{Cli, Commands, Outcome};
use config::{ConfigError, PreflightConfig};
use preflight_runner::RunnerError;

/// CI-friendly exit codes
pub struct ExitCodes;

impl ExitCodes {
    pub const SUCCESS: u8 = 0;
    pub const GENERAL_ERROR: u8 = 1;
    pub const INVALID_ARGS: u8 = 2;
    pub const VALIDATION_FAILURE: u8 = 3;
    pub const TOOL_ERROR: u8 = 4;
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    let result = match std::env::current_dir() {
        Ok(cwd) => match PreflightConfig::load(cli.config.as_deref(), &cwd) {
            Ok(config) => run(cli.command, &config, cli.verbose).await,
            Err(e) => Err(e.into()),
        },
        Err(e) => Err(e.into()),
    };

    match result {
        Ok(Outcome::Passed) => ExitCode::from(ExitCodes::SUCCESS),
        Ok(Outcome::Failed) => ExitCode::from(ExitCodes::VALIDATION_FAILURE),
        Err(e) => {
            eprintln!("❌ Error: {:#}", e);
            ExitCode::from(categorize_error(&e))
        }
    }
}

async fn run(
    command: Commands,
    config: &PreflightConfig,
    verbose: bool,
) -> anyhow::Result<Outcome> {
    match command {
        Commands::Parse(args) => commands::parse::execute(args, config, verbose),
        Commands::Run(args) => commands::run::execute(args, config, verbose).await,
    }
}

fn init_logging(verbose: bool, quiet: bool) {
    let default_directive = if verbose {
        "preflight=debug,warn"
    } else if quiet {
        "error"
    } else {
        "preflight=info,warn"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    // Already initialized is not fatal
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .try_init();
}

/// Map an error to its exit code.
fn categorize_error(e: &anyhow::Error) -> u8 {
    if e.downcast_ref::<ConfigError>().is_some() {
        return ExitCodes::INVALID_ARGS;
    }
    match e.downcast_ref::<RunnerError>() {
        Some(RunnerError::InvalidWorkdir(_)) => ExitCodes::INVALID_ARGS,
        Some(_) => ExitCodes::TOOL_ERROR,
        None => ExitCodes::GENERAL_ERROR,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_categorize_errors() {
        let config_err = anyhow::Error::from(ConfigError::NotFound(PathBuf::from("x.yaml")));
        assert_eq!(categorize_error(&config_err), ExitCodes::INVALID_ARGS);

        let timeout = anyhow::Error::from(RunnerError::Timeout(10));
        assert_eq!(categorize_error(&timeout), ExitCodes::TOOL_ERROR);

        let other = anyhow::anyhow!("something else");
        assert_eq!(categorize_error(&other), ExitCodes::GENERAL_ERROR);
    }
}
