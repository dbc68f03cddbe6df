//! External command execution with fatal/tolerated failure policy

use std::path::PathBuf;
use std::process::Stdio;

use colored::Colorize;
use thiserror::Error;
use tokio::process::Command;

use crate::plan::CommandInvocation;

/// Why a fatal command aborted the run.
#[derive(Debug, Error)]
pub enum ExecError {
    #[error("`{command}` exited with status {status}")]
    NonZero { command: String, status: i32 },
    #[error("failed to launch `{command}`: {source}")]
    Launch {
        command: String,
        #[source]
        source: std::io::Error,
    },
    #[error("empty command invocation")]
    EmptyArgv,
}

/// Result of a command the run tolerates failing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecOutcome {
    Success,
    /// Logged and ignored; the run continues.
    Failed,
}

/// Runs plan commands inside the target project tree. No shell is
/// involved unless an invocation spells one out.
pub struct CommandRunner {
    working_dir: PathBuf,
}

impl CommandRunner {
    pub fn new(working_dir: impl Into<PathBuf>) -> Self {
        CommandRunner {
            working_dir: working_dir.into(),
        }
    }

    /// Check whether a tool resolves on PATH.
    pub fn which(tool: &str) -> bool {
        std::process::Command::new("which")
            .arg(tool)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|status| status.success())
            .unwrap_or(false)
    }

    /// Run one invocation. Fatal invocations propagate failure; tolerated
    /// ones log a warning and report `ExecOutcome::Failed`. Output streams
    /// to the invoker's terminal unless the invocation captures it.
    pub async fn run(&self, invocation: &CommandInvocation) -> Result<ExecOutcome, ExecError> {
        let Some((program, args)) = invocation.argv.split_first() else {
            return Err(ExecError::EmptyArgv);
        };
        let display = invocation.to_string();

        let mut command = Command::new(program);
        command.args(args).current_dir(&self.working_dir);
        if invocation.capture_output {
            command.stdout(Stdio::null()).stderr(Stdio::null());
        }

        let status = match command.status().await {
            Ok(status) => status,
            Err(source) => {
                if invocation.fatal_on_error {
                    return Err(ExecError::Launch {
                        command: display,
                        source,
                    });
                }
                eprintln!(
                    "  {} could not run `{}`: {}",
                    "warning:".yellow(),
                    display,
                    source
                );
                return Ok(ExecOutcome::Failed);
            }
        };

        if status.success() {
            return Ok(ExecOutcome::Success);
        }

        let code = status.code().unwrap_or(-1);
        if invocation.fatal_on_error {
            Err(ExecError::NonZero {
                command: display,
                status: code,
            })
        } else {
            eprintln!(
                "  {} `{}` exited with status {}",
                "warning:".yellow(),
                display,
                code
            );
            Ok(ExecOutcome::Failed)
        }
    }
}
