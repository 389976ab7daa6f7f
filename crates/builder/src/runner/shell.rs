//! Runner that executes commands as child processes

use super::{BuildCommand, CommandRunner};
use async_trait::async_trait;
use exbuild_errors::{BuildError, Error, PlatformError};
use tokio::process::Command;
use tracing::{debug, info, warn};

const FAILURE_TAIL_LINES: usize = 20;

/// Executes commands with tokio, logging their output
#[derive(Debug, Clone, Copy, Default)]
pub struct ShellRunner;

impl ShellRunner {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl CommandRunner for ShellRunner {
    async fn run(&self, cmd: &BuildCommand, title: &str) -> Result<(), Error> {
        info!("{title}");
        debug!(command = %cmd, cwd = ?cmd.get_current_dir(), "executing");

        let program = which::which(cmd.program()).map_err(|_| PlatformError::CommandNotFound {
            command: cmd.program().to_string(),
        })?;

        let mut command = Command::new(&program);
        command.args(cmd.get_args());
        if let Some(dir) = cmd.get_current_dir() {
            command.current_dir(dir);
        }

        let output = command
            .output()
            .await
            .map_err(|e| PlatformError::ProcessExecutionFailed {
                command: cmd.program().to_string(),
                message: e.to_string(),
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);
        let failed = !output.status.success();

        // ninja and compilers report failures on stdout
        for line in stdout.lines() {
            if failed {
                warn!("{line}");
            } else {
                debug!("{line}");
            }
        }
        for line in stderr.lines() {
            warn!("{line}");
        }

        if failed {
            return Err(BuildError::CommandFailed {
                command: cmd.to_string(),
                exit_code: output.status.code(),
                output: failure_tail(&stderr, &stdout),
            }
            .into());
        }

        Ok(())
    }

    fn name(&self) -> &'static str {
        "shell"
    }
}

/// Last lines of the combined tool output, stderr first
fn failure_tail(stderr: &str, stdout: &str) -> String {
    let lines: Vec<&str> = stderr
        .lines()
        .chain(stdout.lines())
        .filter(|line| !line.trim().is_empty())
        .collect();
    let start = lines.len().saturating_sub(FAILURE_TAIL_LINES);
    lines[start..].join("\n")
}
