/// Converter errors
///
/// The export call failing and the export call "succeeding" without
/// producing its output are distinct variants, but both are terminal.
use common::{ProcessError, StagingError};
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConversionError {
    #[error("Serialized model not found: {0}")]
    MissingInput(PathBuf),

    #[error("Export with {exporter} failed: {detail}")]
    ExportFailed {
        exporter: &'static str,
        detail: String,
    },

    #[error("Export finished but expected output {expected} was not found")]
    MissingOutput { expected: PathBuf },

    #[error("Export produced an empty file: {0}")]
    EmptyOutput(PathBuf),

    #[error(transparent)]
    Process(#[from] ProcessError),

    #[error(transparent)]
    Staging(StagingError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<StagingError> for ConversionError {
    fn from(err: StagingError) -> Self {
        match err {
            StagingError::Missing(expected) => ConversionError::MissingOutput { expected },
            StagingError::Empty(path) => ConversionError::EmptyOutput(path),
            other => ConversionError::Staging(other),
        }
    }
}

pub type Result<T> = std::result::Result<T, ConversionError>;
