use crate::error::Result;
use async_trait::async_trait;
use common::ModelId;
use std::path::Path;

/// A backing provider able to materialize a model by name.
///
/// Implementations write the complete serialized model to `destination`,
/// which is always a scratch path; the [`crate::ModelAcquirer`] moves it to
/// the canonical location afterwards. The serialized form must not depend
/// on accelerator availability: tensors are stored for the CPU.
#[async_trait]
pub trait ModelSource: Send + Sync {
    /// Short provider name for diagnostics.
    fn name(&self) -> &'static str;

    async fn fetch(&self, model: &ModelId, destination: &Path) -> Result<()>;
}
