//! Library half of the `model-forge` binary: configuration loading and
//! construction of the concrete pipeline stages.

pub mod config;
pub mod stages;

pub use config::{CliArgs, Command, ForgeConfig, SourceKind};
