//! TensorRT engine compilation through `trtexec`.
//!
//! The compiler is an opaque external executable. Before any real work it
//! is probed with `--version`; the build itself is a single invocation:
//!
//! ```text
//! trtexec --onnx=<input> --saveEngine=<output> --<precision>
//! ```

use crate::error::{CompilerError, Result};
use common::{artifact_present, process, CapturedOutput, Precision, ProcessError, StagingArea};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tokio::process::Command;

/// Invokes the accelerator compiler to turn an ONNX graph into an engine.
#[derive(Debug, Clone)]
pub struct EngineBuilder {
    executable: String,
    timeout: Option<Duration>,
}

impl EngineBuilder {
    pub fn new(executable: impl Into<String>) -> Self {
        Self {
            executable: executable.into(),
            timeout: None,
        }
    }

    /// Kill the compiler if a single invocation runs longer than `timeout`.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn executable(&self) -> &str {
        &self.executable
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Argument list for building `output` from `input` at `precision`.
    pub fn build_args(input: &Path, output: &Path, precision: Precision) -> Vec<OsString> {
        let mut onnx = OsString::from("--onnx=");
        onnx.push(input);

        let mut save = OsString::from("--saveEngine=");
        save.push(output);

        vec![onnx, save, OsString::from(precision.flag())]
    }

    /// Check that the compiler can be invoked, returning its version line.
    pub async fn probe(&self) -> Result<String> {
        let mut cmd = Command::new(&self.executable);
        cmd.arg("--version");

        let output = self.run(&mut cmd).await?;
        if !output.success() {
            return Err(CompilerError::ToolNotFound {
                executable: self.executable.clone(),
                detail: format!(
                    "version probe exited with {}: {}",
                    output.status,
                    output.diagnostics()
                ),
            });
        }

        let version = output
            .stdout
            .lines()
            .chain(output.stderr.lines())
            .map(str::trim)
            .find(|line| !line.is_empty())
            .unwrap_or_default()
            .to_string();

        log::debug!("{} reports version: {}", self.executable, version);
        Ok(version)
    }

    /// Compile `input` into an engine at `output`.
    ///
    /// The engine is written to a staging path first and only renamed to
    /// `output` after the compiler exits successfully.
    pub async fn compile(&self, input: &Path, output: &Path, precision: Precision) -> Result<PathBuf> {
        if !artifact_present(input) {
            return Err(CompilerError::MissingInput(input.to_path_buf()));
        }

        self.probe().await?;

        let parent = match output.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let staging = StagingArea::new_in(parent)?;
        let file_name = output
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "model.engine".to_string());
        let staged = staging.file(&file_name);

        log::info!(
            "Compiling {} to engine with {} precision",
            input.display(),
            precision
        );
        let started = Instant::now();

        let mut cmd = Command::new(&self.executable);
        cmd.args(Self::build_args(input, &staged, precision));

        let captured = self.run(&mut cmd).await?;
        if !captured.success() {
            log::error!("{} failed:\n{}", self.executable, captured.diagnostics());
            return Err(CompilerError::Compilation {
                executable: self.executable.clone(),
                status: captured.status.to_string(),
                stderr: captured.diagnostics().to_string(),
            });
        }

        if !staged.exists() {
            return Err(CompilerError::MissingOutput {
                executable: self.executable.clone(),
                expected: output.to_path_buf(),
            });
        }

        let size = staging.commit(&staged, output)?;
        log::info!(
            "Engine saved to {} ({} bytes, {:.1}s)",
            output.display(),
            size,
            started.elapsed().as_secs_f64()
        );
        Ok(output.to_path_buf())
    }

    async fn run(&self, cmd: &mut Command) -> Result<CapturedOutput> {
        process::run_captured(cmd, self.timeout)
            .await
            .map_err(|e| match e {
                ProcessError::TimedOut { timeout, .. } => CompilerError::TimedOut {
                    executable: self.executable.clone(),
                    timeout,
                },
                ProcessError::Spawn { source, .. } => CompilerError::ToolNotFound {
                    executable: self.executable.clone(),
                    detail: source.to_string(),
                },
            })
    }
}
