//! Local process runner for the validation tool.
//!
//! Spawns the program directly, reads stdout and stderr on separate threads
//! and hands each line to the configured handler as soon as it is read.

use std::io::{BufRead, BufReader, ErrorKind, Read};
use std::process::{Command, ExitStatus, Stdio};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use chrono::Utc;
use tracing::{debug, error, info, warn};

use crate::config::ToolConfig;
use crate::error::{RunnerError, RunnerResult};
use crate::runner::{ExecutionResult, LineHandler, OutputLine, OutputStream, ToolRunner};

const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Runs the tool as a child process of the current one.
#[derive(Debug, Clone, Default)]
pub struct ProcessRunner;

impl ProcessRunner {
    pub fn new() -> Self {
        Self
    }

    fn execute(
        config: &ToolConfig,
        handler: Option<LineHandler>,
    ) -> RunnerResult<ExecutionResult> {
        let mut cmd = Command::new(&config.program);
        cmd.args(&config.args);
        cmd.envs(&config.env);
        cmd.stdin(Stdio::null());
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());

        if let Some(workdir) = &config.workdir {
            if !workdir.is_dir() {
                return Err(RunnerError::InvalidWorkdir(workdir.display().to_string()));
            }
            cmd.current_dir(workdir);
        }

        debug!("Executing: {}", config.command_line());

        let started_at = Utc::now();
        let mut child = cmd.spawn().map_err(|e| match e.kind() {
            ErrorKind::NotFound => RunnerError::ToolNotFound(config.program.clone()),
            _ => RunnerError::ExecutionFailed(format!(
                "Failed to spawn {}: {}",
                config.program, e
            )),
        })?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| RunnerError::ExecutionFailed("stdout was not captured".to_string()))?;
        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| RunnerError::ExecutionFailed("stderr was not captured".to_string()))?;

        let echo = config.echo_output.then_some(config.echo_to_stderr);
        let stdout_handle = spawn_reader(stdout, OutputStream::Stdout, echo, handler.clone());
        let stderr_handle = spawn_reader(stderr, OutputStream::Stderr, echo, handler);

        let status = wait_with_timeout(&mut child, config.timeout_seconds)?;

        let stdout = stdout_handle.join().unwrap_or_default();
        let stderr = stderr_handle.join().unwrap_or_default();

        let finished_at = Utc::now();
        let duration_ms = (finished_at - started_at).num_milliseconds().max(0) as u64;
        let exit_code = status.code().map(i64::from).unwrap_or(-1);

        if exit_code == 0 {
            info!("{} completed in {}ms", config.program, duration_ms);
        } else {
            error!(
                "{} exited with code {} after {}ms",
                config.program, exit_code, duration_ms
            );
        }

        Ok(ExecutionResult {
            exit_code,
            stdout,
            stderr,
            started_at,
            finished_at,
            duration_ms,
        })
    }
}

/// Terminal stream an echoed line is written to.
fn echo_target(stream: OutputStream, to_stderr: bool) -> OutputStream {
    if to_stderr {
        OutputStream::Stderr
    } else {
        stream
    }
}

/// Decode one raw line; invalid UTF-8 is replaced rather than dropped.
fn decode_line(raw: &[u8]) -> String {
    let raw = raw.strip_suffix(b"\r").unwrap_or(raw);
    String::from_utf8_lossy(raw).into_owned()
}

/// `echo` is `None` when echoing is off, otherwise whether to force stderr.
fn spawn_reader<R>(
    source: R,
    stream: OutputStream,
    echo: Option<bool>,
    handler: Option<LineHandler>,
) -> JoinHandle<String>
where
    R: Read + Send + 'static,
{
    std::thread::spawn(move || {
        let reader = BufReader::new(source);
        let mut output = String::new();
        for raw in reader.split(b'\n') {
            let raw = match raw {
                Ok(raw) => raw,
                Err(e) => {
                    warn!("Stopped reading {}: {}", stream, e);
                    break;
                }
            };
            let line = decode_line(&raw);
            output.push_str(&line);
            output.push('\n');

            if let Some(to_stderr) = echo {
                match echo_target(stream, to_stderr) {
                    OutputStream::Stdout => println!("{}", line),
                    OutputStream::Stderr => eprintln!("{}", line),
                }
            }
            if let Some(handler) = &handler {
                handler(OutputLine::new(stream, line));
            }
        }
        output
    })
}

fn wait_with_timeout(
    child: &mut std::process::Child,
    timeout_seconds: u64,
) -> RunnerResult<ExitStatus> {
    if timeout_seconds == 0 {
        return child.wait().map_err(|e| {
            RunnerError::ExecutionFailed(format!("Failed to wait for process: {}", e))
        });
    }

    let timeout = Duration::from_secs(timeout_seconds);
    let start = Instant::now();
    loop {
        match child.try_wait() {
            Ok(Some(status)) => return Ok(status),
            Ok(None) => {
                if start.elapsed() > timeout {
                    let _ = child.kill();
                    let _ = child.wait();
                    return Err(RunnerError::Timeout(timeout_seconds));
                }
                std::thread::sleep(POLL_INTERVAL);
            }
            Err(e) => {
                return Err(RunnerError::ExecutionFailed(format!(
                    "Failed to wait for process: {}",
                    e
                )));
            }
        }
    }
}

#[async_trait]
impl ToolRunner for ProcessRunner {
    async fn is_available(&self, program: &str) -> bool {
        which::which(program).is_ok()
    }

    async fn run(
        &self,
        config: &ToolConfig,
        handler: Option<LineHandler>,
    ) -> RunnerResult<ExecutionResult> {
        info!("Running {}", config.command_line());
        let config = config.clone();
        tokio::task::spawn_blocking(move || Self::execute(&config, handler))
            .await
            .map_err(|e| RunnerError::ExecutionFailed(format!("Runner task failed: {}", e)))?
    }
}

#[cfg(all(test, unix))]
mod tests {
    use std::sync::Arc;

    use parking_lot::Mutex;

    use super::*;

    #[tokio::test]
    async fn test_streams_lines_to_handler() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let handler: LineHandler = Arc::new(move |line: OutputLine| sink.lock().push(line.text));

        let config = ToolConfig::new("sh").args(["-c", "echo one; echo two"]);
        let result = ProcessRunner::new().run(&config, Some(handler)).await.unwrap();

        assert!(result.success());
        assert_eq!(result.stdout, "one\ntwo\n");
        assert_eq!(*seen.lock(), vec!["one".to_string(), "two".to_string()]);
    }

    #[tokio::test]
    async fn test_invalid_utf8_line_does_not_stop_reading() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let handler: LineHandler = Arc::new(move |line: OutputLine| sink.lock().push(line.text));

        let script = concat!(
            r"printf '\377\376 noise\r\n'; ",
            r#"echo '{"level":"info","msg":"azurerm_resource_group.main: success","time":"t1"}'"#,
        );
        let config = ToolConfig::new("sh").args(["-c", script]);
        let result = ProcessRunner::new().run(&config, Some(handler)).await.unwrap();

        assert!(result.success());
        let seen = seen.lock();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[0], "\u{fffd}\u{fffd} noise");
        assert!(seen[1].contains("azurerm_resource_group.main: success"));
        assert!(result.stdout.contains("azurerm_resource_group.main: success"));
    }

    #[test]
    fn test_decode_line_strips_carriage_return() {
        assert_eq!(decode_line(b"plain\r"), "plain");
        assert_eq!(decode_line(b"\xffok"), "\u{fffd}ok");
    }

    #[test]
    fn test_echo_target() {
        assert_eq!(echo_target(OutputStream::Stdout, false), OutputStream::Stdout);
        assert_eq!(echo_target(OutputStream::Stdout, true), OutputStream::Stderr);
        assert_eq!(echo_target(OutputStream::Stderr, false), OutputStream::Stderr);
    }

    #[tokio::test]
    async fn test_is_available_uses_path_lookup() {
        let runner = ProcessRunner::new();
        assert!(runner.is_available("sh").await);
        assert!(!runner.is_available("definitely-not-a-preflight-tool").await);
    }

    #[tokio::test]
    async fn test_non_zero_exit_is_reported() {
        let config = ToolConfig::new("sh").args(["-c", "echo oops >&2; exit 3"]);
        let result = ProcessRunner::new().run(&config, None).await.unwrap();

        assert_eq!(result.exit_code, 3);
        assert_eq!(result.stderr, "oops\n");
    }

    #[tokio::test]
    async fn test_missing_program() {
        let config = ToolConfig::new("definitely-not-a-preflight-tool");
        let err = ProcessRunner::new().run(&config, None).await.unwrap_err();
        assert!(matches!(err, RunnerError::ToolNotFound(_)));
    }

    #[tokio::test]
    async fn test_timeout_kills_process() {
        let config = ToolConfig::new("sh").args(["-c", "sleep 5"]).timeout(1);
        let err = ProcessRunner::new().run(&config, None).await.unwrap_err();
        assert!(matches!(err, RunnerError::Timeout(1)));
    }

    #[tokio::test]
    async fn test_invalid_workdir() {
        let config = ToolConfig::new("sh").workdir("/nonexistent/preflight/dir");
        let err = ProcessRunner::new().run(&config, None).await.unwrap_err();
        assert!(matches!(err, RunnerError::InvalidWorkdir(_)));
    }
}
