//! Terminal and JSON rendering of preflight results.

use std::collections::BTreeMap;
use std::fmt::Write;

use serde::Serialize;

use preflight_log::{LogLevel, Summary};
use preflight_runner::PreflightRun;

use crate::config::OutputFormat;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RunReport<'a> {
    exit_code: i64,
    duration_ms: u64,
    passed: bool,
    summary: &'a Summary,
}

/// Render a summary of parsed output.
pub fn render_summary(
    summary: &Summary,
    levels: Option<&BTreeMap<LogLevel, usize>>,
    format: OutputFormat,
) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(summary.to_json()?),
        OutputFormat::Text => {
            let mut out = String::new();
            if let Some(levels) = levels {
                writeln!(out, "{}", render_levels(levels))?;
            }
            write!(out, "{}", summary)?;
            Ok(out)
        }
    }
}

/// Render the result of running the tool.
pub fn render_run(
    run: &PreflightRun,
    levels: Option<&BTreeMap<LogLevel, usize>>,
    format: OutputFormat,
) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(&RunReport {
            exit_code: run.execution.exit_code,
            duration_ms: run.execution.duration_ms,
            passed: run.passed(),
            summary: &run.summary,
        })?),
        OutputFormat::Text => {
            let mut out = String::new();
            writeln!(
                out,
                "Tool exited with code {} after {}ms",
                run.execution.exit_code, run.execution.duration_ms
            )?;
            out.push_str(&render_summary(&run.summary, levels, format)?);
            Ok(out)
        }
    }
}

fn render_levels(levels: &BTreeMap<LogLevel, usize>) -> String {
    let counts: Vec<String> = levels
        .iter()
        .map(|(level, count)| format!("{}={}", level, count))
        .collect();
    format!("Entries: {}", counts.join(" "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use preflight_log::LogAggregator;
    use preflight_runner::ExecutionResult;

    fn aggregator() -> LogAggregator {
        let mut aggregator = LogAggregator::new();
        aggregator.parse_output(concat!(
            r#"{"level":"info","msg":"azurerm_resource_group.main: success","time":"t1"}"#,
            "\n",
            r#"{"level":"debug","msg":"checking quotas","time":"t2"}"#,
        ));
        aggregator
    }

    #[test]
    fn test_text_summary_with_levels() {
        let aggregator = aggregator();
        let text = render_summary(
            &aggregator.summary(),
            Some(&aggregator.level_counts()),
            OutputFormat::Text,
        )
        .unwrap();

        assert!(text.starts_with("Entries: debug=1 info=1\n"));
        assert!(text.contains("1 total, 1 succeeded, 0 failed"));
        assert!(text.ends_with("Preflight validation passed"));
    }

    #[test]
    fn test_json_run_report() {
        let aggregator = aggregator();
        let execution = ExecutionResult {
            exit_code: 0,
            stdout: String::new(),
            stderr: String::new(),
            started_at: chrono::Utc::now(),
            finished_at: chrono::Utc::now(),
            duration_ms: 42,
        };
        let run = PreflightRun {
            execution,
            summary: aggregator.summary(),
        };

        let json = render_run(&run, None, OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["exitCode"], 0);
        assert_eq!(value["durationMs"], 42);
        assert_eq!(value["passed"], true);
        assert_eq!(value["summary"]["totalResources"], 1);
    }
}
