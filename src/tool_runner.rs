/*!
 * Execution of the external catalog tools (extract, init, compile).
 *
 * Tools are run to completion with their output captured. A spawn failure or
 * a timeout is reported as a `ToolOutput` without exit code, so callers only
 * have one failure shape to deal with.
 */

use async_trait::async_trait;
use log::{debug, warn};
use std::fmt;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;

/// A program and its arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolCommand {
    pub program: String,
    pub args: Vec<String>,
}

impl ToolCommand {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Append one argument
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// First argument, i.e. the tool subcommand
    pub fn subcommand(&self) -> Option<&str> {
        self.args.first().map(String::as_str)
    }
}

impl fmt::Display for ToolCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// Captured result of a tool run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolOutput {
    /// Exit status; `None` when the process could not be started, was
    /// killed by a signal or timed out
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl ToolOutput {
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }

    /// Short diagnostic for error messages
    pub fn describe_failure(&self) -> String {
        let status = match self.exit_code {
            Some(code) => format!("exit status {}", code),
            None => "no exit status".to_string(),
        };
        let detail = self.stderr.trim();
        if detail.is_empty() {
            status
        } else {
            format!("{}: {}", status, detail)
        }
    }
}

/// Runs external tools
#[async_trait]
pub trait ToolRunner: Send + Sync {
    async fn run(&self, command: &ToolCommand) -> ToolOutput;
}

/// Runs tools as child processes of this one
#[derive(Debug, Clone)]
pub struct ProcessToolRunner {
    timeout: Duration,
}

impl ProcessToolRunner {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

#[async_trait]
impl ToolRunner for ProcessToolRunner {
    async fn run(&self, command: &ToolCommand) -> ToolOutput {
        debug!("Running: {}", command);

        let child = Command::new(&command.program)
            .args(&command.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output();

        match tokio::time::timeout(self.timeout, child).await {
            Ok(Ok(output)) => ToolOutput {
                exit_code: output.status.code(),
                stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            },
            Ok(Err(e)) => {
                warn!("Failed to start {}: {}", command.program, e);
                ToolOutput {
                    exit_code: None,
                    stdout: String::new(),
                    stderr: format!("failed to start {}: {}", command.program, e),
                }
            }
            Err(_) => {
                warn!("{} timed out after {}s", command, self.timeout.as_secs());
                ToolOutput {
                    exit_code: None,
                    stdout: String::new(),
                    stderr: format!("timed out after {}s", self.timeout.as_secs()),
                }
            }
        }
    }
}
