//! Captured execution of external tools.
//!
//! Every external program the pipeline drives (the Python model tooling,
//! the accelerator compiler) runs through [`run_captured`]: stdin is closed,
//! stdout and stderr are collected in full, and the caller receives the exit
//! status together with both streams once the child has exited.

use crate::errors::ProcessError;
use std::process::{ExitStatus, Stdio};
use std::time::Duration;
use tokio::process::Command;
use tracing::{debug, info};

/// Output of a finished external program.
#[derive(Debug, Clone)]
pub struct CapturedOutput {
    pub status: ExitStatus,
    pub stdout: String,
    pub stderr: String,
}

impl CapturedOutput {
    pub fn success(&self) -> bool {
        self.status.success()
    }

    pub fn code(&self) -> Option<i32> {
        self.status.code()
    }

    /// Text worth showing a user when the program failed.
    ///
    /// Prefers stderr; some tools report fatal errors on stdout only.
    pub fn diagnostics(&self) -> &str {
        let stderr = self.stderr.trim();
        if stderr.is_empty() {
            self.stdout.trim()
        } else {
            stderr
        }
    }
}

/// Render a command line for log output.
pub fn describe(cmd: &Command) -> String {
    let std_cmd = cmd.as_std();
    std::iter::once(std_cmd.get_program())
        .chain(std_cmd.get_args())
        .map(|part| part.to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Run `cmd` to completion, capturing stdout and stderr.
///
/// With `timeout` set, the child is killed when the budget runs out.
/// Without it the call waits as long as the program runs.
pub async fn run_captured(
    cmd: &mut Command,
    timeout: Option<Duration>,
) -> Result<CapturedOutput, ProcessError> {
    let program = cmd.as_std().get_program().to_string_lossy().into_owned();

    cmd.stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    info!("Running: {}", describe(cmd));

    let output = match timeout {
        Some(limit) => tokio::time::timeout(limit, cmd.output())
            .await
            .map_err(|_| ProcessError::TimedOut {
                program: program.clone(),
                timeout: limit,
            })?,
        None => cmd.output().await,
    }
    .map_err(|source| ProcessError::Spawn {
        program: program.clone(),
        source,
    })?;

    debug!("'{}' exited with {}", program, output.status);

    Ok(CapturedOutput {
        status: output.status,
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    })
}
