use crate::error::{PipelineError, Result};
use crate::stage::{AcquireStage, CompileStage, ConvertStage, Stage};
use crate::types::{PipelineConfig, PipelineReport, StageOutcome, StagePlan};
use common::{artifact_present, ArtifactLayout};
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Drives acquire, convert and compile in order over one output directory.
///
/// A stage is skipped when its output artifact is already present. The
/// first failing stage stops the run; nothing downstream of it is invoked.
pub struct Pipeline {
    acquirer: Arc<dyn AcquireStage>,
    converter: Arc<dyn ConvertStage>,
    compiler: Arc<dyn CompileStage>,
}

impl Pipeline {
    pub fn new(
        acquirer: Arc<dyn AcquireStage>,
        converter: Arc<dyn ConvertStage>,
        compiler: Arc<dyn CompileStage>,
    ) -> Self {
        Self {
            acquirer,
            converter,
            compiler,
        }
    }

    /// Per-stage run/skip decision for the directory as it is now.
    ///
    /// Reads metadata only. A stage planned to run may still be followed by
    /// a skipped one, since skips consult only each stage's own output.
    pub fn plan(config: &PipelineConfig) -> Vec<StagePlan> {
        let layout = config.layout();
        Stage::ALL
            .iter()
            .map(|&stage| {
                let output = layout.path(stage.output_kind());
                let outcome = if artifact_present(&output) {
                    StageOutcome::Skipped
                } else {
                    StageOutcome::Ran
                };
                StagePlan {
                    stage,
                    output,
                    outcome,
                }
            })
            .collect()
    }

    pub async fn run(&self, config: &PipelineConfig) -> Result<PipelineReport> {
        tokio::fs::create_dir_all(&config.output_dir)
            .await
            .map_err(|source| PipelineError::OutputDirectory {
                path: config.output_dir.clone(),
                source,
            })?;

        let layout = config.layout();
        let mut report = PipelineReport::new(config);

        log::info!(
            "Building '{}' ({}) in {}",
            config.model,
            config.precision,
            config.output_dir.display()
        );

        for stage in Stage::ALL {
            let output = layout.path(stage.output_kind());

            if artifact_present(&output) {
                log::info!(
                    "{} already exists at {}, skipping {}",
                    stage.output_kind(),
                    output.display(),
                    stage
                );
                report.record(stage, StageOutcome::Skipped, &output, Duration::ZERO);
                continue;
            }

            if let Some(kind) = stage.input_kind() {
                let input = layout.path(kind);
                if !artifact_present(&input) {
                    log::error!("Refusing to {}: {} is missing", stage, input.display());
                    return Err(PipelineError::MissingInput { stage, path: input });
                }
            }

            let started = Instant::now();
            if let Err(e) = self.invoke(stage, &layout, config, &output).await {
                log::error!("{} stage failed for '{}': {}", stage, config.model, e);
                return Err(e);
            }

            if !artifact_present(&output) {
                return Err(PipelineError::MissingOutput { stage, path: output });
            }

            let elapsed = started.elapsed();
            log::info!("{} finished in {:.1}s", stage, elapsed.as_secs_f64());
            report.record(stage, StageOutcome::Ran, &output, elapsed);
        }

        log::info!(
            "Pipeline complete for '{}' ({} of {} stages ran)",
            config.model,
            report.ran().count(),
            Stage::ALL.len()
        );
        Ok(report)
    }

    async fn invoke(
        &self,
        stage: Stage,
        layout: &ArtifactLayout,
        config: &PipelineConfig,
        output: &Path,
    ) -> Result<()> {
        match stage {
            Stage::Acquire => self.acquirer.acquire(&config.model, output).await?,
            Stage::Convert => {
                self.converter
                    .convert(&layout.serialized_model(), output)
                    .await?
            }
            Stage::Compile => {
                self.compiler
                    .compile(&layout.interchange(), output, config.precision)
                    .await?
            }
        }
        Ok(())
    }
}
