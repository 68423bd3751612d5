//! Common types and utilities shared across the model-forge crates.
//!
//! This crate provides the vocabulary every pipeline stage speaks:
//! model identifiers, precision modes, the on-disk artifact layout, atomic
//! staging of outputs, and captured execution of external tools.
//!
//! # Architecture
//!
//! The `common` crate sits at the bottom of the dependency hierarchy:
//! - Has NO dependencies on other workspace crates
//! - Provides shared types that all stage crates can use
//! - Ensures every stage computes artifact paths the same way

pub mod artifacts;
pub mod errors;
pub mod precision;
pub mod process;
pub mod staging;

pub use artifacts::{artifact_present, ArtifactKind, ArtifactLayout};
pub use errors::{ProcessError, StagingError, ValidationError};
pub use precision::Precision;
pub use process::{run_captured, CapturedOutput};
pub use staging::StagingArea;

// --- Core Newtype Wrappers ---

/// Logical name of a pretrained model (e.g. `yolov8n`).
///
/// The identifier doubles as the file stem of every artifact the pipeline
/// writes, so only `[A-Za-z0-9._-]` is accepted and the name may not start
/// with a dot or contain `..`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ModelId(String);

impl ModelId {
    /// Create a new ModelId, rejecting names that cannot be used as a file stem.
    pub fn new(id: impl Into<String>) -> Result<Self, ValidationError> {
        let id = id.into();
        if Self::is_valid(&id) {
            Ok(Self(id))
        } else {
            Err(ValidationError::ModelId(id))
        }
    }

    /// Get the inner string reference
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume and return the inner string
    pub fn into_inner(self) -> String {
        self.0
    }

    fn is_valid(id: &str) -> bool {
        if id.is_empty() || id.starts_with('.') || id.contains("..") {
            return false;
        }

        id.chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.')
    }
}

impl std::fmt::Display for ModelId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for ModelId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for ModelId {
    type Error = ValidationError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<ModelId> for String {
    fn from(id: ModelId) -> Self {
        id.0
    }
}
