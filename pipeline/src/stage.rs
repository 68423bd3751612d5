//! The three stages and the seams the controller drives them through.
//!
//! Each trait takes fully resolved paths; a stage never computes where its
//! input lives or calls another stage.

use async_trait::async_trait;
use common::{ArtifactKind, ModelId, Precision};
use forge_engine_builder::{CompilerError, EngineBuilder};
use forge_exporter::{ConversionError, Converter};
use forge_model_cache::{AcquisitionError, ModelAcquirer};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Pipeline stages in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Acquire,
    Convert,
    Compile,
}

impl Stage {
    pub const ALL: [Stage; 3] = [Stage::Acquire, Stage::Convert, Stage::Compile];

    /// Artifact this stage must find before it may run.
    pub const fn input_kind(self) -> Option<ArtifactKind> {
        match self {
            Stage::Acquire => None,
            Stage::Convert => Some(ArtifactKind::SerializedModel),
            Stage::Compile => Some(ArtifactKind::Interchange),
        }
    }

    pub const fn output_kind(self) -> ArtifactKind {
        match self {
            Stage::Acquire => ArtifactKind::SerializedModel,
            Stage::Convert => ArtifactKind::Interchange,
            Stage::Compile => ArtifactKind::Engine,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Stage::Acquire => "acquire",
            Stage::Convert => "convert",
            Stage::Compile => "compile",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

#[async_trait]
pub trait AcquireStage: Send + Sync {
    async fn acquire(&self, model: &ModelId, destination: &Path) -> Result<(), AcquisitionError>;
}

#[async_trait]
pub trait ConvertStage: Send + Sync {
    async fn convert(&self, serialized: &Path, destination: &Path) -> Result<(), ConversionError>;
}

#[async_trait]
pub trait CompileStage: Send + Sync {
    async fn compile(
        &self,
        interchange: &Path,
        destination: &Path,
        precision: Precision,
    ) -> Result<(), CompilerError>;
}

#[async_trait]
impl AcquireStage for ModelAcquirer {
    async fn acquire(&self, model: &ModelId, destination: &Path) -> Result<(), AcquisitionError> {
        self.acquire_to(model, destination).await
    }
}

#[async_trait]
impl ConvertStage for Converter {
    async fn convert(&self, serialized: &Path, destination: &Path) -> Result<(), ConversionError> {
        Converter::convert(self, serialized, destination).await
    }
}

#[async_trait]
impl CompileStage for EngineBuilder {
    async fn compile(
        &self,
        interchange: &Path,
        destination: &Path,
        precision: Precision,
    ) -> Result<(), CompilerError> {
        EngineBuilder::compile(self, interchange, destination, precision)
            .await
            .map(|_| ())
    }
}
