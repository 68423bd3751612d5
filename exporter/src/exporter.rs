use crate::error::{ConversionError, Result};
use crate::options::ExportOptions;
use async_trait::async_trait;
use common::process;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::process::Command;

/// A tool that turns a serialized model into an interchange graph.
///
/// Exporters choose where their output lands; [`Exporter::default_output`]
/// declares that location so the [`crate::Converter`] can find and relocate
/// it.
#[async_trait]
pub trait Exporter: Send + Sync {
    fn name(&self) -> &'static str;

    /// Where `export(input, ..)` leaves its artifact.
    fn default_output(&self, input: &Path, options: &ExportOptions) -> PathBuf;

    async fn export(&self, input: &Path, options: &ExportOptions) -> Result<()>;
}

const EXPORTER: &str = "ultralytics";

/// Exports through the Ultralytics Python package.
///
/// Ultralytics writes the exported graph next to the weights file, with the
/// format's extension (`model.pt` -> `model.onnx`).
#[derive(Debug, Clone)]
pub struct UltralyticsExporter {
    python: String,
    timeout: Option<Duration>,
}

impl UltralyticsExporter {
    pub fn new(python: impl Into<String>) -> Self {
        Self {
            python: python.into(),
            timeout: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    fn script(options: &ExportOptions) -> String {
        format!(
            "import sys\nfrom ultralytics import YOLO\nYOLO(sys.argv[1]).export({})\n",
            options.python_kwargs()
        )
    }
}

#[async_trait]
impl Exporter for UltralyticsExporter {
    fn name(&self) -> &'static str {
        EXPORTER
    }

    fn default_output(&self, input: &Path, options: &ExportOptions) -> PathBuf {
        input.with_extension(options.format)
    }

    async fn export(&self, input: &Path, options: &ExportOptions) -> Result<()> {
        let mut cmd = Command::new(&self.python);
        cmd.arg("-c").arg(Self::script(options)).arg(input);
        if let Some(dir) = input.parent() {
            cmd.current_dir(dir);
        }

        let output = process::run_captured(&mut cmd, self.timeout)
            .await
            .map_err(|e| {
                if e.is_not_found() {
                    ConversionError::ExportFailed {
                        exporter: EXPORTER,
                        detail: format!("Python interpreter '{}' not found", self.python),
                    }
                } else {
                    ConversionError::Process(e)
                }
            })?;

        if !output.success() {
            return Err(ConversionError::ExportFailed {
                exporter: EXPORTER,
                detail: output.diagnostics().to_string(),
            });
        }

        Ok(())
    }
}
