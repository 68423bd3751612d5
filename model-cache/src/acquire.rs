use crate::error::Result;
use crate::source::ModelSource;
use common::{ArtifactKind, ArtifactLayout, ModelId, StagingArea};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

/// Resolves model identifiers to serialized models on local storage.
pub struct ModelAcquirer {
    source: Arc<dyn ModelSource>,
}

impl ModelAcquirer {
    pub fn new(source: Arc<dyn ModelSource>) -> Self {
        Self { source }
    }

    /// Acquire `model` into `output_dir`, returning the serialized model path.
    pub async fn acquire(&self, model: &ModelId, output_dir: &Path) -> Result<PathBuf> {
        let destination =
            ArtifactLayout::new(output_dir, model.clone()).path(ArtifactKind::SerializedModel);
        self.acquire_to(model, &destination).await?;
        Ok(destination)
    }

    /// Acquire `model` into an explicit destination path.
    ///
    /// The provider writes into a staging directory next to `destination`;
    /// the file only appears at `destination` once complete.
    pub async fn acquire_to(&self, model: &ModelId, destination: &Path) -> Result<()> {
        let parent = match destination.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        tokio::fs::create_dir_all(parent).await?;

        log::info!(
            "Acquiring model '{}' via {} -> {}",
            model,
            self.source.name(),
            destination.display()
        );
        let started = Instant::now();

        let staging = StagingArea::new_in(parent)?;
        let staged = staging.file(&format!("acquired-{}.{}", model, ArtifactKind::SerializedModel.extension()));

        self.source.fetch(model, &staged).await?;
        let size = staging.commit(&staged, destination)?;

        log::info!(
            "Model saved to {} ({} bytes, {:.1}s)",
            destination.display(),
            size,
            started.elapsed().as_secs_f64()
        );
        Ok(())
    }
}
