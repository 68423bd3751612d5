//! Configuration for the `model-forge` binary.
//!
//! Supports:
//! - CLI arguments and their environment variables (highest priority)
//! - TOML config file
//! - Defaults (lowest priority)
//!
//! Defaults are applied here and nowhere else; the pipeline receives a
//! fully resolved [`PipelineConfig`].

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use common::{ModelId, Precision};
use forge_pipeline::PipelineConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_MODEL: &str = "yolov8n";
pub const DEFAULT_OUTPUT_DIR: &str = "./models";
pub const DEFAULT_CONFIG_FILE: &str = "forge.toml";
pub const DEFAULT_TRTEXEC: &str = "trtexec";

/// Interpreter used for the Python-backed stages on this platform.
pub fn default_python() -> &'static str {
    if cfg!(target_os = "windows") {
        "python"
    } else {
        "python3"
    }
}

/// Command-line arguments for model-forge.
#[derive(Parser, Debug, Clone)]
#[command(name = "model-forge")]
#[command(about = "Acquire a detector, export it to ONNX and compile a TensorRT engine")]
#[command(version)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Model identifier (e.g. yolov8n)
    #[arg(long, short = 'm', env = "FORGE_MODEL", global = true)]
    pub model: Option<ModelId>,

    /// Directory holding <model>.pt, <model>.onnx and <model>.engine
    #[arg(long, short = 'o', env = "FORGE_OUTPUT_DIR", global = true)]
    pub output_dir: Option<PathBuf>,

    /// Engine precision: fp32, fp16 or int8
    #[arg(long, short = 'p', env = "FORGE_PRECISION", global = true)]
    pub precision: Option<Precision>,

    /// Configuration file path
    #[arg(long, short = 'c', default_value = DEFAULT_CONFIG_FILE, env = "FORGE_CONFIG", global = true)]
    pub config: PathBuf,

    /// Where serialized models come from
    #[arg(long, value_enum, env = "FORGE_SOURCE", global = true)]
    pub source: Option<SourceKind>,

    /// Python interpreter with ultralytics installed
    #[arg(long, env = "FORGE_PYTHON", global = true)]
    pub python: Option<String>,

    /// TensorRT compiler executable
    #[arg(long, env = "FORGE_TRTEXEC", global = true)]
    pub trtexec: Option<String>,

    /// Base URL of the model hub (hub source only)
    #[arg(long, env = "FORGE_HUB_URL", global = true)]
    pub hub_url: Option<String>,

    /// Hub repository as owner/repo (hub source only)
    #[arg(long, env = "FORGE_HUB_REPO", global = true)]
    pub hub_repo: Option<String>,

    /// Kill the Python loader or exporter after this many seconds
    #[arg(long, env = "FORGE_PYTHON_TIMEOUT", global = true)]
    pub python_timeout: Option<u64>,

    /// Kill trtexec after this many seconds
    #[arg(long, env = "FORGE_COMPILE_TIMEOUT", global = true)]
    pub compile_timeout: Option<u64>,

    /// Log level
    #[arg(long, default_value = "info", env = "RUST_LOG", global = true)]
    pub log_level: String,

    /// Print the run report or plan as JSON on stdout
    #[arg(long, global = true)]
    pub json: bool,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Run every stage whose artifact is missing (default)
    Run,
    /// Show which stages would run, without running them
    Plan,
    /// Check that the TensorRT compiler can be invoked
    Probe,
}

impl CliArgs {
    pub fn command(&self) -> Command {
        self.command.unwrap_or(Command::Run)
    }
}

/// Model provider selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// Load through ultralytics in a Python subprocess
    #[default]
    Python,
    /// Download a published checkpoint over HTTP
    Hub,
}

/// Full configuration (merged from all sources).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForgeConfig {
    pub model: String,
    pub output_dir: PathBuf,
    pub precision: Precision,
    pub python: String,
    pub python_timeout_secs: Option<u64>,
    pub source: SourceConfig,
    pub compiler: CompilerConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    pub kind: SourceKind,
    pub hub_url: String,
    pub hub_repo: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompilerConfig {
    pub executable: String,
    pub timeout_secs: Option<u64>,
}

impl ForgeConfig {
    /// Load configuration from CLI args and optional config file.
    ///
    /// Priority: CLI args > Environment > Config file > Defaults
    pub fn load(args: &CliArgs) -> Result<Self> {
        let mut config = if args.config.exists() {
            Self::from_file(&args.config)
                .with_context(|| format!("Failed to load config from {:?}", args.config))?
        } else {
            Self::default()
        };

        if let Some(ref model) = args.model {
            config.model = model.to_string();
        }
        if let Some(ref output_dir) = args.output_dir {
            config.output_dir = output_dir.clone();
        }
        if let Some(precision) = args.precision {
            config.precision = precision;
        }
        if let Some(ref python) = args.python {
            config.python = python.clone();
        }
        if let Some(secs) = args.python_timeout {
            config.python_timeout_secs = Some(secs);
        }
        if let Some(source) = args.source {
            config.source.kind = source;
        }
        if let Some(ref hub_url) = args.hub_url {
            config.source.hub_url = hub_url.clone();
        }
        if let Some(ref hub_repo) = args.hub_repo {
            config.source.hub_repo = Some(hub_repo.clone());
        }
        if let Some(ref trtexec) = args.trtexec {
            config.compiler.executable = trtexec.clone();
        }
        if let Some(secs) = args.compile_timeout {
            config.compiler.timeout_secs = Some(secs);
        }

        config.model_id()?;
        Ok(config)
    }

    /// Load configuration from a TOML file. Missing keys take defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;

        let config: ForgeConfig = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {:?}", path))?;

        Ok(config)
    }

    pub fn model_id(&self) -> Result<ModelId> {
        ModelId::new(self.model.as_str()).with_context(|| format!("Invalid model identifier {:?}", self.model))
    }

    pub fn pipeline_config(&self) -> Result<PipelineConfig> {
        Ok(PipelineConfig::new(self.model_id()?, &self.output_dir, self.precision))
    }

    /// Zero disables the timeout.
    pub fn compile_timeout(&self) -> Option<Duration> {
        timeout(self.compiler.timeout_secs)
    }

    /// Applies to both Python-backed stages. Zero disables the timeout.
    pub fn python_timeout(&self) -> Option<Duration> {
        timeout(self.python_timeout_secs)
    }
}

fn timeout(secs: Option<u64>) -> Option<Duration> {
    secs.filter(|secs| *secs > 0).map(Duration::from_secs)
}

impl Default for ForgeConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            precision: Precision::Fp16,
            python: default_python().to_string(),
            python_timeout_secs: None,
            source: SourceConfig::default(),
            compiler: CompilerConfig::default(),
        }
    }
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            kind: SourceKind::Python,
            hub_url: forge_model_cache::HUGGINGFACE_BASE.to_string(),
            hub_repo: None,
        }
    }
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            executable: DEFAULT_TRTEXEC.to_string(),
            timeout_secs: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(argv: &[&str]) -> CliArgs {
        let mut full = vec!["model-forge", "--config", "does-not-exist.toml"];
        full.extend_from_slice(argv);
        CliArgs::try_parse_from(full).unwrap()
    }

    #[test]
    fn test_default_config() {
        let config = ForgeConfig::default();
        assert_eq!(config.model, "yolov8n");
        assert_eq!(config.output_dir, PathBuf::from("./models"));
        assert_eq!(config.precision, Precision::Fp16);
        assert_eq!(config.source.kind, SourceKind::Python);
        assert_eq!(config.compiler.executable, "trtexec");
        assert_eq!(config.compile_timeout(), None);
    }

    #[test]
    fn test_cli_args_override() {
        let args = args(&[
            "--model",
            "detector-small",
            "--precision",
            "INT8",
            "--output-dir",
            "/tmp/engines",
            "--compile-timeout",
            "900",
            "plan",
        ]);

        assert_eq!(args.command(), Command::Plan);
        let config = ForgeConfig::load(&args).unwrap();
        assert_eq!(config.model, "detector-small");
        assert_eq!(config.precision, Precision::Int8);
        assert_eq!(config.output_dir, PathBuf::from("/tmp/engines"));
        assert_eq!(config.compile_timeout(), Some(Duration::from_secs(900)));
    }

    #[test]
    fn test_run_is_default_command() {
        assert_eq!(args(&[]).command(), Command::Run);
    }

    #[test]
    fn test_rejects_unknown_precision() {
        let err = CliArgs::try_parse_from(["model-forge", "--precision", "fp8"]).unwrap_err();
        assert!(err.to_string().contains("fp8"));
    }

    #[test]
    fn test_rejects_path_like_model() {
        assert!(CliArgs::try_parse_from(["model-forge", "--model", "../yolov8n"]).is_err());
    }

    #[test]
    fn test_zero_timeout_disables() {
        let mut config = ForgeConfig::default();
        config.compiler.timeout_secs = Some(0);
        config.python_timeout_secs = Some(0);
        assert_eq!(config.compile_timeout(), None);
        assert_eq!(config.python_timeout(), None);
    }

    #[test]
    fn test_python_timeout_from_args() {
        let config = ForgeConfig::load(&args(&["--python-timeout", "300"])).unwrap();
        assert_eq!(config.python_timeout(), Some(Duration::from_secs(300)));
        assert_eq!(config.compile_timeout(), None);
    }

    #[test]
    fn test_pipeline_config() {
        let config = ForgeConfig::default().pipeline_config().unwrap();
        assert_eq!(config.model.as_str(), "yolov8n");
        assert_eq!(config.output_dir, PathBuf::from("./models"));
        assert_eq!(config.precision, Precision::Fp16);
    }
}
