//! Error types shared by the stage crates.

use std::io;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Rejected user-facing values.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// The model identifier cannot be used as an artifact file stem.
    #[error("Invalid model identifier '{0}': use only letters, digits, '-', '_' and '.', without path separators")]
    ModelId(String),

    /// The precision mode is not one of the supported values.
    #[error("Unsupported precision '{0}': expected one of fp32, fp16, int8")]
    Precision(String),
}

/// Failure to run an external tool to completion.
///
/// A non-zero exit status is NOT a `ProcessError`; callers inspect
/// [`crate::CapturedOutput`] and decide what that means for their stage.
#[derive(Debug, Error)]
pub enum ProcessError {
    /// The program could not be started (missing binary, permissions, ...).
    #[error("Failed to start '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    /// The program exceeded its time budget and was killed.
    #[error("'{program}' did not finish within {timeout:?}")]
    TimedOut { program: String, timeout: Duration },
}

impl ProcessError {
    /// True when the program itself could not be found.
    pub fn is_not_found(&self) -> bool {
        matches!(self, ProcessError::Spawn { source, .. } if source.kind() == io::ErrorKind::NotFound)
    }
}

/// Errors raised while moving a staged output into its canonical location.
#[derive(Debug, Error)]
pub enum StagingError {
    #[error("Failed to create staging area in {dir}: {source}")]
    Create {
        dir: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Expected output was not produced: {0}")]
    Missing(PathBuf),

    #[error("Produced output is empty: {0}")]
    Empty(PathBuf),

    #[error("Failed to move {from} to {to}: {source}")]
    Commit {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: io::Error,
    },
}
