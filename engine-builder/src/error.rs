use common::StagingError;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur while building an engine with the external compiler
#[derive(Debug, Error)]
pub enum CompilerError {
    /// The compiler could not be started or its version probe failed.
    #[error("Accelerator compiler '{executable}' is not available: {detail}")]
    ToolNotFound { executable: String, detail: String },

    #[error("Interchange artifact not found: {0}")]
    MissingInput(PathBuf),

    /// The compiler ran and exited non-zero. `stderr` holds the captured
    /// error stream (stdout when the tool wrote nothing to stderr).
    #[error("{executable} exited with {status}:\n{stderr}")]
    Compilation {
        executable: String,
        status: String,
        stderr: String,
    },

    #[error("{executable} exited successfully but did not write {expected}")]
    MissingOutput { executable: String, expected: PathBuf },

    #[error("{executable} did not finish within {timeout:?}")]
    TimedOut { executable: String, timeout: Duration },

    #[error(transparent)]
    Staging(#[from] StagingError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, CompilerError>;
