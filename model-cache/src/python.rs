//! Ultralytics-backed model source.
//!
//! Resolves the identifier through the Ultralytics model zoo inside a
//! Python subprocess, moves the loaded model to the CPU and saves it.

use crate::error::{AcquisitionError, Result};
use crate::source::ModelSource;
use async_trait::async_trait;
use common::{process, ModelId};
use std::path::Path;
use std::time::Duration;
use tokio::process::Command;

const PROVIDER: &str = "ultralytics";

/// Exit code the loader script uses for an unknown identifier.
const EXIT_UNKNOWN_MODEL: i32 = 2;
/// Exit code the loader script uses when `ultralytics` is not importable.
const EXIT_MISSING_TOOLING: i32 = 3;
/// Exit code the loader script uses when fetching the weights fails on the network.
const EXIT_NETWORK: i32 = 4;

const LOADER_SCRIPT: &str = r#"
import sys

name, destination = sys.argv[1], sys.argv[2]

try:
    from ultralytics import YOLO
except ImportError as exc:
    print(f"ultralytics is not installed: {exc}", file=sys.stderr)
    sys.exit(3)

try:
    model = YOLO(name)
except FileNotFoundError as exc:
    print(str(exc), file=sys.stderr)
    sys.exit(2)
except (ConnectionError, OSError) as exc:
    print(f"weights download failed: {exc}", file=sys.stderr)
    sys.exit(4)

model.to("cpu")
model.save(destination)
"#;

/// Loads models through the Ultralytics Python package.
#[derive(Debug, Clone)]
pub struct UltralyticsSource {
    python: String,
    timeout: Option<Duration>,
}

impl UltralyticsSource {
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
}

#[async_trait]
impl ModelSource for UltralyticsSource {
    fn name(&self) -> &'static str {
        PROVIDER
    }

    async fn fetch(&self, model: &ModelId, destination: &Path) -> Result<()> {
        let mut cmd = Command::new(&self.python);
        cmd.arg("-c")
            .arg(LOADER_SCRIPT)
            .arg(model.as_str())
            .arg(destination);

        // Ultralytics downloads weights into the working directory.
        if let Some(scratch) = destination.parent() {
            cmd.current_dir(scratch);
        }

        let output = process::run_captured(&mut cmd, self.timeout)
            .await
            .map_err(|e| {
                if e.is_not_found() {
                    AcquisitionError::ProviderUnreachable {
                        provider: PROVIDER,
                        detail: format!("Python interpreter '{}' not found", self.python),
                    }
                } else {
                    AcquisitionError::Process(e)
                }
            })?;

        if output.success() {
            return Ok(());
        }

        let detail = output.diagnostics().to_string();
        Err(match output.code() {
            Some(EXIT_UNKNOWN_MODEL) => AcquisitionError::UnknownModel {
                model: model.clone(),
                provider: PROVIDER,
                detail,
            },
            Some(EXIT_MISSING_TOOLING) | Some(EXIT_NETWORK) => AcquisitionError::ProviderUnreachable {
                provider: PROVIDER,
                detail,
            },
            _ => AcquisitionError::ProviderFailed {
                model: model.clone(),
                provider: PROVIDER,
                detail,
            },
        })
    }
}
