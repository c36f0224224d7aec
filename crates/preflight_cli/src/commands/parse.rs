//! Parse command - Summarize captured preflight output.

use std::fs::File;
use std::io::{self, BufReader};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use tracing::info;

use preflight_log::LogAggregator;

use crate::commands::Outcome;
use crate::config::{OutputFormat, PreflightConfig};
use crate::report;

#[derive(Args)]
pub struct ParseArgs {
    /// File with captured output (`-` or omitted reads stdin)
    file: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum)]
    format: Option<OutputFormat>,
}

pub fn execute(args: ParseArgs, config: &PreflightConfig, verbose: bool) -> Result<Outcome> {
    let mut aggregator = LogAggregator::new();

    let recognized = match args.file.as_deref() {
        Some(path) if path.as_os_str() != "-" => {
            info!("Parsing preflight output from {:?}", path);
            let file = File::open(path)
                .with_context(|| format!("Failed to open {}", path.display()))?;
            aggregator.ingest_reader(BufReader::new(file))?
        }
        _ => {
            info!("Parsing preflight output from stdin");
            aggregator.ingest_reader(io::stdin().lock())?
        }
    };
    info!("Recognized {} log entries", recognized);

    let summary = aggregator.summary();
    let format = args.format.unwrap_or(config.output.format);
    let levels = (verbose || config.output.show_levels).then(|| aggregator.level_counts());

    println!("{}", report::render_summary(&summary, levels.as_ref(), format)?);

    Ok(Outcome::from_passed(summary.passed()))
}
