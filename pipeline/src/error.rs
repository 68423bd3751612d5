/// Pipeline errors
///
/// Each stage keeps its own error type; the controller wraps them so the
/// entry point sees one error with the originating stage preserved.
use crate::stage::Stage;
use forge_engine_builder::CompilerError;
use forge_exporter::ConversionError;
use forge_model_cache::AcquisitionError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Acquire stage failed")]
    Acquisition(#[from] AcquisitionError),

    #[error("Convert stage failed")]
    Conversion(#[from] ConversionError),

    #[error("Compile stage failed")]
    Compilation(#[from] CompilerError),

    /// A stage was about to run but its upstream artifact is absent.
    #[error("{stage} stage requires {path}, which does not exist")]
    MissingInput { stage: Stage, path: PathBuf },

    /// A stage reported success without leaving its artifact behind.
    #[error("{stage} stage finished but {path} was not produced")]
    MissingOutput { stage: Stage, path: PathBuf },

    #[error("Cannot create output directory {path}: {source}")]
    OutputDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl PipelineError {
    /// The stage the failure originated in, if any.
    pub fn stage(&self) -> Option<Stage> {
        match self {
            PipelineError::Acquisition(_) => Some(Stage::Acquire),
            PipelineError::Conversion(_) => Some(Stage::Convert),
            PipelineError::Compilation(_) => Some(Stage::Compile),
            PipelineError::MissingInput { stage, .. } | PipelineError::MissingOutput { stage, .. } => {
                Some(*stage)
            }
            PipelineError::OutputDirectory { .. } => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, PipelineError>;
