use common::{ModelId, ProcessError, StagingError};
use thiserror::Error;

/// Failure to materialize a serialized model locally.
#[derive(Debug, Error)]
pub enum AcquisitionError {
    #[error("Model '{model}' is unknown to {provider}: {detail}")]
    UnknownModel {
        model: ModelId,
        provider: &'static str,
        detail: String,
    },

    #[error("Model provider {provider} is unreachable: {detail}")]
    ProviderUnreachable {
        provider: &'static str,
        detail: String,
    },

    #[error("Model provider {provider} failed to deliver '{model}': {detail}")]
    ProviderFailed {
        model: ModelId,
        provider: &'static str,
        detail: String,
    },

    #[error("Invalid model source configuration: {0}")]
    InvalidSource(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error(transparent)]
    Process(#[from] ProcessError),

    #[error(transparent)]
    Staging(#[from] StagingError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, AcquisitionError>;
