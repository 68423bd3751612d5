use crate::error::{ConversionError, Result};
use crate::exporter::Exporter;
use crate::options::ExportOptions;
use common::{artifact_present, ArtifactKind, StagingArea};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

/// Turns a serialized model into an interchange artifact at a canonical path.
///
/// The exporter runs against a private copy of the serialized model inside a
/// staging directory. Its output is located at the exporter's declared
/// default location and moved to the requested destination.
pub struct Converter {
    exporter: Arc<dyn Exporter>,
    options: ExportOptions,
}

impl Converter {
    pub fn new(exporter: Arc<dyn Exporter>) -> Self {
        Self {
            exporter,
            options: ExportOptions::PINNED,
        }
    }

    /// Convert next to the serialized model: `dir/name.pt` -> `dir/name.onnx`.
    pub async fn convert_to_interchange(&self, serialized: &Path) -> Result<PathBuf> {
        let destination = serialized.with_extension(ArtifactKind::Interchange.extension());
        self.convert(serialized, &destination).await?;
        Ok(destination)
    }

    pub async fn convert(&self, serialized: &Path, destination: &Path) -> Result<()> {
        if !artifact_present(serialized) {
            return Err(ConversionError::MissingInput(serialized.to_path_buf()));
        }

        let parent = match destination.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        log::info!(
            "Exporting {} to {} with {} (opset {}, simplify={})",
            serialized.display(),
            self.options.format,
            self.exporter.name(),
            self.options.opset,
            self.options.simplify
        );
        let started = Instant::now();

        let staging = StagingArea::new_in(parent)?;
        let file_name = serialized
            .file_name()
            .ok_or_else(|| ConversionError::MissingInput(serialized.to_path_buf()))?;
        let staged_input = staging.path().join(file_name);
        link_or_copy(serialized, &staged_input)?;

        self.exporter.export(&staged_input, &self.options).await?;

        let produced = self.exporter.default_output(&staged_input, &self.options);
        if !produced.exists() {
            log::error!(
                "{} reported success but {} does not exist",
                self.exporter.name(),
                produced.display()
            );
            return Err(ConversionError::MissingOutput { expected: produced });
        }

        let size = staging.commit(&produced, destination)?;
        log::info!(
            "Interchange artifact saved to {} ({} bytes, {:.1}s)",
            destination.display(),
            size,
            started.elapsed().as_secs_f64()
        );
        Ok(())
    }
}

fn link_or_copy(from: &Path, to: &Path) -> std::io::Result<()> {
    if fs::hard_link(from, to).is_ok() {
        return Ok(());
    }
    log::debug!("Hard link failed, copying {} instead", from.display());
    fs::copy(from, to).map(|_| ())
}
