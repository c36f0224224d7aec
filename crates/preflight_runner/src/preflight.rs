//! Preflight orchestration: run the tool and aggregate its output live.

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{info, warn};

use preflight_log::{LogAggregator, Summary};

use crate::config::ToolConfig;
use crate::error::RunnerResult;
use crate::runner::{ExecutionResult, LineHandler, OutputLine, ToolRunner};

/// Aggregator shared between the caller and the reader threads.
pub type SharedAggregator = Arc<Mutex<LogAggregator>>;

/// Outcome of a preflight run.
#[derive(Debug, Clone)]
pub struct PreflightRun {
    pub execution: ExecutionResult,
    pub summary: Summary,
}

impl PreflightRun {
    /// The tool exited cleanly and reported no errors or failed resources.
    pub fn passed(&self) -> bool {
        self.execution.success() && self.summary.passed()
    }
}

/// Run the validation tool, feeding every output line into `aggregator`.
///
/// The aggregator keeps its state after the run, so callers can inspect
/// entries or keep feeding it. Both streams are parsed since the tool may
/// write its structured records to either one.
pub async fn run_preflight(
    runner: &dyn ToolRunner,
    config: &ToolConfig,
    aggregator: SharedAggregator,
) -> RunnerResult<PreflightRun> {
    let sink = aggregator.clone();
    let handler: LineHandler = Arc::new(move |line: OutputLine| {
        sink.lock().parse_line(&line.text);
    });

    let execution = runner.run(config, Some(handler)).await?;
    let summary = aggregator.lock().summary();

    info!(
        "Preflight finished: {} resources, {} failed, {} errors",
        summary.total_resources,
        summary.failed_resources,
        summary.errors.len()
    );
    if !execution.success() && summary.passed() {
        warn!(
            "{} exited with code {} without reporting errors",
            config.program, execution.exit_code
        );
    }

    Ok(PreflightRun { execution, summary })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{MockResponse, MockRunner};

    #[tokio::test]
    async fn test_run_aggregates_stdout() {
        let runner = MockRunner::new().add_response(MockResponse::success(concat!(
            r#"{"level":"info","msg":"azurerm_resource_group.main: success","time":"t1"}"#,
            "\nnot a record\n",
            r#"{"level":"info","msg":"azurerm_subnet.internal: failed","time":"t2"}"#,
        )));
        let aggregator = SharedAggregator::default();

        let run = run_preflight(&runner, &ToolConfig::default(), aggregator.clone())
            .await
            .unwrap();

        assert_eq!(run.summary.total_resources, 2);
        assert_eq!(run.summary.failed_resources, 1);
        assert!(!run.passed());
        assert_eq!(aggregator.lock().entries().len(), 2);
    }

    #[tokio::test]
    async fn test_errors_on_stderr_are_captured() {
        let runner = MockRunner::new().add_response(MockResponse::failure(
            1,
            r#"{"level":"fatal","msg":"failed to show plan file: exit status 1\n","time":"t"}"#,
        ));
        let aggregator = SharedAggregator::default();

        let run = run_preflight(&runner, &ToolConfig::default(), aggregator)
            .await
            .unwrap();

        assert_eq!(run.summary.errors.len(), 1);
        assert_eq!(run.summary.errors[0].message, "failed to show plan file: exit status 1\n");
    }

    #[tokio::test]
    async fn test_nonzero_exit_fails_even_with_clean_summary() {
        let runner =
            MockRunner::new().add_response(MockResponse::failure(2, "usage: aztfpreflight"));
        let run = run_preflight(&runner, &ToolConfig::default(), SharedAggregator::default())
            .await
            .unwrap();

        assert!(run.summary.passed());
        assert!(!run.passed());
    }
}
