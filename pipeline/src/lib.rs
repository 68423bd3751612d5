/// Model Forge Pipeline Crate
///
/// **Sequences acquire, convert and compile over one output directory.**
///
/// # Architecture
///
/// The controller composes the stage crates instead of re-implementing them:
/// - **`model-cache`**: `ModelAcquirer` produces `<model>.pt`
/// - **`exporter`**: `Converter` produces `<model>.onnx`
/// - **`engine-builder`**: `EngineBuilder` produces `<model>.engine`
///
/// Each is reached through a stage trait (`AcquireStage`, `ConvertStage`,
/// `CompileStage`), so the controller can be exercised without Python or
/// TensorRT installed.
///
/// # Example
///
/// ```no_run
/// use common::{ModelId, Precision};
/// use forge_engine_builder::EngineBuilder;
/// use forge_exporter::{Converter, UltralyticsExporter};
/// use forge_model_cache::{ModelAcquirer, UltralyticsSource};
/// use forge_pipeline::{Pipeline, PipelineConfig};
/// use std::sync::Arc;
///
/// # async fn build() -> forge_pipeline::Result<()> {
/// let pipeline = Pipeline::new(
///     Arc::new(ModelAcquirer::new(Arc::new(UltralyticsSource::new("python3")))),
///     Arc::new(Converter::new(Arc::new(UltralyticsExporter::new("python3")))),
///     Arc::new(EngineBuilder::new("trtexec")),
/// );
/// let model = ModelId::new("yolov8n").expect("valid identifier");
/// let config = PipelineConfig::new(model, "./models", Precision::Fp16);
/// let report = pipeline.run(&config).await?;
/// println!("engine at {:?}", report.engine());
/// # Ok(())
/// # }
/// ```

pub mod controller;
pub mod error;
pub mod stage;
pub mod types;

pub use controller::Pipeline;
pub use error::{PipelineError, Result};
pub use stage::{AcquireStage, CompileStage, ConvertStage, Stage};
pub use types::{PipelineConfig, PipelineReport, StageOutcome, StagePlan, StageReport};
