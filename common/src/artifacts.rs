//! Deterministic on-disk layout of pipeline artifacts.
//!
//! Every artifact lives directly in one output directory and is named after
//! the model identifier:
//!
//! ```text
//! <output_dir>/
//!   <model>.pt       serialized model   (Acquirer)
//!   <model>.onnx     interchange graph  (Converter)
//!   <model>.engine   compiled engine    (Compiler Invoker)
//! ```
//!
//! Presence of these files is the only persisted state; there is no manifest.

use crate::ModelId;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// The three artifact kinds the pipeline produces, in production order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactKind {
    SerializedModel,
    Interchange,
    Engine,
}

impl ArtifactKind {
    pub const ALL: [ArtifactKind; 3] = [
        ArtifactKind::SerializedModel,
        ArtifactKind::Interchange,
        ArtifactKind::Engine,
    ];

    pub const fn extension(self) -> &'static str {
        match self {
            ArtifactKind::SerializedModel => "pt",
            ArtifactKind::Interchange => "onnx",
            ArtifactKind::Engine => "engine",
        }
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ArtifactKind::SerializedModel => "serialized model",
            ArtifactKind::Interchange => "interchange artifact",
            ArtifactKind::Engine => "compiled engine",
        };
        f.write_str(name)
    }
}

/// Canonical artifact paths for one model in one output directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactLayout {
    output_dir: PathBuf,
    model: ModelId,
}

impl ArtifactLayout {
    pub fn new(output_dir: impl Into<PathBuf>, model: ModelId) -> Self {
        Self {
            output_dir: output_dir.into(),
            model,
        }
    }

    pub fn file_name(&self, kind: ArtifactKind) -> String {
        format!("{}.{}", self.model, kind.extension())
    }

    pub fn path(&self, kind: ArtifactKind) -> PathBuf {
        self.output_dir.join(self.file_name(kind))
    }

    pub fn serialized_model(&self) -> PathBuf {
        self.path(ArtifactKind::SerializedModel)
    }

    pub fn interchange(&self) -> PathBuf {
        self.path(ArtifactKind::Interchange)
    }

    pub fn engine(&self) -> PathBuf {
        self.path(ArtifactKind::Engine)
    }

    pub fn is_present(&self, kind: ArtifactKind) -> bool {
        artifact_present(&self.path(kind))
    }
}

/// True if `path` is a regular, non-empty file.
///
/// Stages never produce empty artifacts, so a zero-byte file is not evidence
/// of a completed stage.
pub fn artifact_present(path: &Path) -> bool {
    fs::metadata(path)
        .map(|meta| meta.is_file() && meta.len() > 0)
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout() -> ArtifactLayout {
        ArtifactLayout::new("/data/models", ModelId::new("detector-small").unwrap())
    }

    #[test]
    fn test_paths() {
        let layout = layout();
        assert_eq!(layout.serialized_model(), PathBuf::from("/data/models/detector-small.pt"));
        assert_eq!(layout.interchange(), PathBuf::from("/data/models/detector-small.onnx"));
        assert_eq!(layout.engine(), PathBuf::from("/data/models/detector-small.engine"));
    }

    #[test]
    fn test_presence_requires_content() {
        let dir = tempfile::tempdir().unwrap();
        let layout = ArtifactLayout::new(dir.path(), ModelId::new("m").unwrap());

        assert!(!layout.is_present(ArtifactKind::Interchange));

        fs::write(layout.interchange(), b"").unwrap();
        assert!(!layout.is_present(ArtifactKind::Interchange));

        fs::write(layout.interchange(), b"graph").unwrap();
        assert!(layout.is_present(ArtifactKind::Interchange));
    }

    #[test]
    fn test_directory_is_not_an_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let layout = ArtifactLayout::new(dir.path(), ModelId::new("m").unwrap());
        fs::create_dir(layout.engine()).unwrap();
        assert!(!layout.is_present(ArtifactKind::Engine));
    }
}
