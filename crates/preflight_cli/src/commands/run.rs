//! Run command - Execute the validation tool and summarize its output.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use tracing::{info, warn};

use preflight_runner::{run_preflight, ProcessRunner, SharedAggregator, ToolConfig, ToolRunner};

use crate::commands::Outcome;
use crate::config::{OutputFormat, PreflightConfig};
use crate::report;

#[derive(Args)]
pub struct RunArgs {
    /// Program to run instead of the configured one
    #[arg(long)]
    program: Option<String>,

    /// Working directory for the tool
    #[arg(short, long)]
    workdir: Option<PathBuf>,

    /// Timeout in seconds (0 disables the timeout)
    #[arg(long)]
    timeout: Option<u64>,

    /// Echo raw tool output while it runs
    #[arg(long)]
    echo: bool,

    /// Output format
    #[arg(short, long, value_enum)]
    format: Option<OutputFormat>,

    /// Extra arguments passed to the tool
    #[arg(last = true)]
    tool_args: Vec<String>,
}

impl RunArgs {
    /// Merge flags over the configured tool settings.
    ///
    /// Echoed lines go to stderr when the report is JSON so stdout stays parseable.
    fn tool_config(&self, base: &ToolConfig, format: OutputFormat) -> ToolConfig {
        let mut config = base.clone();
        if let Some(program) = &self.program {
            config.program = program.clone();
        }
        if let Some(workdir) = &self.workdir {
            config.workdir = Some(workdir.clone());
        }
        if let Some(timeout) = self.timeout {
            config.timeout_seconds = timeout;
        }
        config.echo_output = config.echo_output || self.echo;
        config.echo_to_stderr = config.echo_to_stderr || format == OutputFormat::Json;
        config.args(self.tool_args.iter().cloned())
    }
}

pub async fn execute(args: RunArgs, config: &PreflightConfig, verbose: bool) -> Result<Outcome> {
    let format = args.format.unwrap_or(config.output.format);
    let tool = args.tool_config(&config.tool, format);
    let runner = ProcessRunner::new();

    if !runner.is_available(&tool.program).await {
        warn!("{} was not found on PATH", tool.program);
    }

    info!("Starting preflight validation with {}", tool.program);
    let aggregator = SharedAggregator::default();
    let run = run_preflight(&runner, &tool, aggregator.clone()).await?;

    let levels = (verbose || config.output.show_levels).then(|| aggregator.lock().level_counts());

    println!("{}", report::render_run(&run, levels.as_ref(), format)?);

    Ok(Outcome::from_passed(run.passed()))
}
