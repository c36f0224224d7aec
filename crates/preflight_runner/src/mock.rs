//! Mock tool runner for testing.
//!
//! Returns scripted responses and records every call, so orchestration can
//! be tested without the real validation tool installed.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;

use crate::config::ToolConfig;
use crate::error::{RunnerError, RunnerResult};
use crate::runner::{ExecutionResult, LineHandler, OutputLine, OutputStream, ToolRunner};

/// Predefined mock response for a tool execution.
#[derive(Debug, Clone)]
pub struct MockResponse {
    pub exit_code: i64,
    pub stdout: String,
    pub stderr: String,
    pub duration_ms: u64,
}

impl MockResponse {
    pub fn success(stdout: impl Into<String>) -> Self {
        Self {
            exit_code: 0,
            stdout: stdout.into(),
            stderr: String::new(),
            duration_ms: 100,
        }
    }

    pub fn failure(exit_code: i64, stderr: impl Into<String>) -> Self {
        Self {
            exit_code,
            stdout: String::new(),
            stderr: stderr.into(),
            duration_ms: 100,
        }
    }

    pub fn with_stdout(mut self, stdout: impl Into<String>) -> Self {
        self.stdout = stdout.into();
        self
    }
}

/// Captured call information for verification.
#[derive(Debug, Clone)]
pub struct CapturedCall {
    pub method: String,
    pub program: String,
    pub args: Vec<String>,
    pub env: HashMap<String, String>,
    pub workdir: Option<PathBuf>,
}

/// Mock tool runner.
#[derive(Clone)]
pub struct MockRunner {
    available: Arc<RwLock<bool>>,
    responses: Arc<RwLock<Vec<MockResponse>>>,
    response_index: Arc<AtomicUsize>,
    captured_calls: Arc<RwLock<Vec<CapturedCall>>>,
    simulate_failure: Arc<RwLock<Option<RunnerFailure>>>,
}

/// Failure the mock should return instead of a response.
#[derive(Debug, Clone)]
pub enum RunnerFailure {
    NotFound,
    Timeout(u64),
    Execution(String),
}

impl Default for MockRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl MockRunner {
    pub fn new() -> Self {
        Self {
            available: Arc::new(RwLock::new(true)),
            responses: Arc::new(RwLock::new(Vec::new())),
            response_index: Arc::new(AtomicUsize::new(0)),
            captured_calls: Arc::new(RwLock::new(Vec::new())),
            simulate_failure: Arc::new(RwLock::new(None)),
        }
    }

    pub fn set_available(self, available: bool) -> Self {
        *self.available.write() = available;
        self
    }

    /// Add a mock response for the next run call.
    pub fn add_response(self, response: MockResponse) -> Self {
        self.responses.write().push(response);
        self
    }

    pub fn simulate_failure(self, failure: RunnerFailure) -> Self {
        *self.simulate_failure.write() = Some(failure);
        self
    }

    pub fn get_calls(&self) -> Vec<CapturedCall> {
        self.captured_calls.read().clone()
    }

    pub fn call_count(&self) -> usize {
        self.captured_calls.read().len()
    }

    pub fn was_called(&self, method: &str) -> bool {
        self.captured_calls.read().iter().any(|c| c.method == method)
    }

    fn record_call(&self, method: &str, config: Option<&ToolConfig>) {
        let call = match config {
            Some(config) => CapturedCall {
                method: method.to_string(),
                program: config.program.clone(),
                args: config.args.clone(),
                env: config.env.clone(),
                workdir: config.workdir.clone(),
            },
            None => CapturedCall {
                method: method.to_string(),
                program: String::new(),
                args: Vec::new(),
                env: HashMap::new(),
                workdir: None,
            },
        };
        self.captured_calls.write().push(call);
    }

    fn next_response(&self) -> MockResponse {
        let responses = self.responses.read();
        if responses.is_empty() {
            return MockResponse::success("");
        }
        let index = self.response_index.fetch_add(1, Ordering::SeqCst);
        responses
            .get(index % responses.len())
            .cloned()
            .unwrap_or_else(|| MockResponse::success(""))
    }

    fn check_failure(&self, program: &str) -> RunnerResult<()> {
        match self.simulate_failure.read().clone() {
            Some(RunnerFailure::NotFound) => Err(RunnerError::ToolNotFound(program.to_string())),
            Some(RunnerFailure::Timeout(secs)) => Err(RunnerError::Timeout(secs)),
            Some(RunnerFailure::Execution(msg)) => Err(RunnerError::ExecutionFailed(msg)),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl ToolRunner for MockRunner {
    async fn is_available(&self, _program: &str) -> bool {
        self.record_call("is_available", None);
        *self.available.read()
    }

    async fn run(
        &self,
        config: &ToolConfig,
        handler: Option<LineHandler>,
    ) -> RunnerResult<ExecutionResult> {
        self.record_call("run", Some(config));
        self.check_failure(&config.program)?;

        let response = self.next_response();
        if let Some(handler) = &handler {
            for line in response.stdout.lines() {
                handler(OutputLine::new(OutputStream::Stdout, line));
            }
            for line in response.stderr.lines() {
                handler(OutputLine::new(OutputStream::Stderr, line));
            }
        }

        let started_at = Utc::now();
        Ok(ExecutionResult {
            exit_code: response.exit_code,
            stdout: response.stdout,
            stderr: response.stderr,
            started_at,
            finished_at: started_at + chrono::Duration::milliseconds(response.duration_ms as i64),
            duration_ms: response.duration_ms,
        })
    }
}
