//! Atomic commits of stage outputs.
//!
//! Stages write into a hidden scratch directory created inside the output
//! directory and only rename a file into its canonical path once it is
//! known to be complete. The rename stays on one filesystem, so a canonical
//! artifact is either absent or whole. Dropping the [`StagingArea`] removes
//! whatever a failed stage left behind.

use crate::errors::StagingError;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tracing::debug;

const STAGING_PREFIX: &str = ".forge-staging-";

/// Scratch directory for one stage invocation.
#[derive(Debug)]
pub struct StagingArea {
    dir: TempDir,
}

impl StagingArea {
    /// Create a staging directory inside `output_dir`.
    ///
    /// The staging path is absolute, so it stays valid for tools started
    /// with a different working directory.
    pub fn new_in(output_dir: &Path) -> Result<Self, StagingError> {
        let create_error = |source| StagingError::Create {
            dir: output_dir.to_path_buf(),
            source,
        };
        let output_dir = std::path::absolute(output_dir).map_err(create_error)?;
        let dir = tempfile::Builder::new()
            .prefix(STAGING_PREFIX)
            .tempdir_in(&output_dir)
            .map_err(create_error)?;

        debug!("Created staging area {}", dir.path().display());
        Ok(Self { dir })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Path of `file_name` inside the staging directory.
    pub fn file(&self, file_name: &str) -> PathBuf {
        self.dir.path().join(file_name)
    }

    /// Move a finished file to `destination`, returning its size in bytes.
    ///
    /// Fails with [`StagingError::Missing`] if the file was never written and
    /// with [`StagingError::Empty`] if it has no content.
    pub fn commit(&self, staged: &Path, destination: &Path) -> Result<u64, StagingError> {
        let meta = match fs::metadata(staged) {
            Ok(meta) if meta.is_file() => meta,
            _ => return Err(StagingError::Missing(staged.to_path_buf())),
        };

        if meta.len() == 0 {
            return Err(StagingError::Empty(staged.to_path_buf()));
        }

        fs::rename(staged, destination).map_err(|source| StagingError::Commit {
            from: staged.to_path_buf(),
            to: destination.to_path_buf(),
            source,
        })?;

        debug!(
            "Committed {} -> {} ({} bytes)",
            staged.display(),
            destination.display(),
            meta.len()
        );
        Ok(meta.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_commit_moves_file() {
        let out = tempfile::tempdir().unwrap();
        let staging = StagingArea::new_in(out.path()).unwrap();
        assert!(staging.path().starts_with(out.path()));

        let staged = staging.file("model.onnx");
        fs::write(&staged, b"graph-bytes").unwrap();

        let dest = out.path().join("model.onnx");
        let size = staging.commit(&staged, &dest).unwrap();

        assert_eq!(size, 11);
        assert!(!staged.exists());
        assert_eq!(fs::read(&dest).unwrap(), b"graph-bytes");
    }

    #[test]
    fn test_commit_rejects_missing_and_empty() {
        let out = tempfile::tempdir().unwrap();
        let staging = StagingArea::new_in(out.path()).unwrap();
        let dest = out.path().join("model.engine");

        let staged = staging.file("model.engine");
        assert!(matches!(
            staging.commit(&staged, &dest),
            Err(StagingError::Missing(_))
        ));

        fs::write(&staged, b"").unwrap();
        assert!(matches!(
            staging.commit(&staged, &dest),
            Err(StagingError::Empty(_))
        ));
        assert!(!dest.exists());
    }

    #[test]
    fn test_drop_cleans_up() {
        let out = tempfile::tempdir().unwrap();
        let scratch = {
            let staging = StagingArea::new_in(out.path()).unwrap();
            fs::write(staging.file("partial.pt"), b"half").unwrap();
            staging.path().to_path_buf()
        };

        assert!(!scratch.exists());
        assert_eq!(fs::read_dir(out.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_missing_output_dir() {
        let out = tempfile::tempdir().unwrap();
        let err = StagingArea::new_in(&out.path().join("nope")).unwrap_err();
        assert!(matches!(err, StagingError::Create { .. }));
    }
}
