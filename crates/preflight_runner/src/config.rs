//! Tool invocation configuration.

use std::collections::HashMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Default program used for preflight validation.
pub const DEFAULT_PROGRAM: &str = "aztfpreflight";

/// How to launch the validation tool.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolConfig {
    /// Program to execute (looked up on PATH)
    pub program: String,
    /// Arguments passed to the program
    pub args: Vec<String>,
    /// Working directory for the process
    pub workdir: Option<PathBuf>,
    /// Extra environment variables
    pub env: HashMap<String, String>,
    /// Timeout in seconds (0 = no timeout)
    pub timeout_seconds: u64,
    /// Echo output lines to the terminal as they arrive
    pub echo_output: bool,
    /// Echo every stream to stderr, keeping stdout for the report
    pub echo_to_stderr: bool,
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self::new(DEFAULT_PROGRAM)
    }
}

impl ToolConfig {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            workdir: None,
            env: HashMap::new(),
            timeout_seconds: 600,
            echo_output: false,
            echo_to_stderr: false,
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn workdir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.workdir = Some(dir.into());
        self
    }

    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }

    pub fn timeout(mut self, seconds: u64) -> Self {
        self.timeout_seconds = seconds;
        self
    }

    pub fn echo_output(mut self, echo: bool) -> Self {
        self.echo_output = echo;
        self
    }

    pub fn echo_to_stderr(mut self, to_stderr: bool) -> Self {
        self.echo_to_stderr = to_stderr;
        self
    }

    /// Command line for logging.
    pub fn command_line(&self) -> String {
        let mut cmd = self.program.clone();
        for arg in &self.args {
            if arg.contains(' ') {
                cmd.push_str(&format!(" '{}'", arg));
            } else {
                cmd.push_str(&format!(" {}", arg));
            }
        }
        cmd
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let config = ToolConfig::new("aztfpreflight")
            .arg("-i")
            .arg("tfplan.json")
            .env("ARM_SUBSCRIPTION_ID", "00000000")
            .workdir("/tmp/infra")
            .timeout(30);

        assert_eq!(config.args, vec!["-i", "tfplan.json"]);
        assert_eq!(config.env.get("ARM_SUBSCRIPTION_ID"), Some(&"00000000".to_string()));
        assert_eq!(config.workdir, Some(PathBuf::from("/tmp/infra")));
        assert_eq!(config.timeout_seconds, 30);
        assert!(!config.echo_output);
    }

    #[test]
    fn test_command_line_quotes_spaces() {
        let config = ToolConfig::new("aztfpreflight").args(["-i", "my plan.json"]);
        assert_eq!(config.command_line(), "aztfpreflight -i 'my plan.json'");
    }

    #[test]
    fn test_default_program() {
        assert_eq!(ToolConfig::default().program, DEFAULT_PROGRAM);
    }
}
