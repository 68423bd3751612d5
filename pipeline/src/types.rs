/// Controller inputs and outputs.
///
/// `PipelineConfig` is built at the entry point with every default already
/// applied; nothing below the entry point fills in missing values.
use crate::stage::Stage;
use common::{ArtifactLayout, ModelId, Precision};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    pub model: ModelId,
    pub output_dir: PathBuf,
    pub precision: Precision,
}

impl PipelineConfig {
    pub fn new(model: ModelId, output_dir: impl Into<PathBuf>, precision: Precision) -> Self {
        Self {
            model,
            output_dir: output_dir.into(),
            precision,
        }
    }

    pub fn layout(&self) -> ArtifactLayout {
        ArtifactLayout::new(&self.output_dir, self.model.clone())
    }
}

/// What `run` would do for one stage given the current directory contents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StagePlan {
    pub stage: Stage,
    pub output: PathBuf,
    pub outcome: StageOutcome,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StageOutcome {
    Ran,
    Skipped,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StageReport {
    pub stage: Stage,
    pub outcome: StageOutcome,
    pub path: PathBuf,
    /// Wall-clock seconds spent in the stage; zero when skipped.
    pub elapsed_secs: f64,
}

/// Result of a successful `Pipeline::run`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PipelineReport {
    pub model: ModelId,
    pub precision: Precision,
    pub output_dir: PathBuf,
    pub stages: Vec<StageReport>,
}

impl PipelineReport {
    pub(crate) fn new(config: &PipelineConfig) -> Self {
        Self {
            model: config.model.clone(),
            precision: config.precision,
            output_dir: config.output_dir.clone(),
            stages: Vec::with_capacity(Stage::ALL.len()),
        }
    }

    pub(crate) fn record(&mut self, stage: Stage, outcome: StageOutcome, path: &Path, elapsed: Duration) {
        self.stages.push(StageReport {
            stage,
            outcome,
            path: path.to_path_buf(),
            elapsed_secs: elapsed.as_secs_f64(),
        });
    }

    pub fn ran(&self) -> impl Iterator<Item = Stage> + '_ {
        self.stages
            .iter()
            .filter(|report| report.outcome == StageOutcome::Ran)
            .map(|report| report.stage)
    }

    pub fn is_fully_cached(&self) -> bool {
        self.ran().next().is_none()
    }

    /// Path of the compiled engine, the pipeline's final product.
    pub fn engine(&self) -> Option<&Path> {
        self.stages
            .iter()
            .find(|report| report.stage == Stage::Compile)
            .map(|report| report.path.as_path())
    }

    pub fn total_elapsed(&self) -> Duration {
        Duration::from_secs_f64(self.stages.iter().map(|report| report.elapsed_secs).sum())
    }
}
