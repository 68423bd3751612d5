//! Wires the concrete stage implementations from a resolved configuration.

use crate::config::{ForgeConfig, SourceKind};
use anyhow::{Context, Result};
use forge_engine_builder::EngineBuilder;
use forge_exporter::{Converter, UltralyticsExporter};
use forge_model_cache::{HubSource, ModelAcquirer, ModelSource, UltralyticsSource};
use forge_pipeline::Pipeline;
use std::sync::Arc;

pub fn model_source(config: &ForgeConfig) -> Result<Arc<dyn ModelSource>> {
    match config.source.kind {
        SourceKind::Python => {
            let source = UltralyticsSource::new(config.python.as_str());
            Ok(Arc::new(match config.python_timeout() {
                Some(timeout) => source.with_timeout(timeout),
                None => source,
            }))
        }
        SourceKind::Hub => {
            let repo = config
                .source
                .hub_repo
                .as_deref()
                .context("The hub source needs a repository (--hub-repo or [source] hub_repo)")?;
            let source = HubSource::new(repo)
                .context("Failed to configure hub source")?
                .with_base_url(config.source.hub_url.as_str());
            Ok(Arc::new(source))
        }
    }
}

pub fn engine_builder(config: &ForgeConfig) -> EngineBuilder {
    let builder = EngineBuilder::new(config.compiler.executable.as_str());
    match config.compile_timeout() {
        Some(timeout) => builder.with_timeout(timeout),
        None => builder,
    }
}

pub fn exporter(config: &ForgeConfig) -> UltralyticsExporter {
    let exporter = UltralyticsExporter::new(config.python.as_str());
    match config.python_timeout() {
        Some(timeout) => exporter.with_timeout(timeout),
        None => exporter,
    }
}

pub fn build_pipeline(config: &ForgeConfig) -> Result<Pipeline> {
    let acquirer = ModelAcquirer::new(model_source(config)?);
    let converter = Converter::new(Arc::new(exporter(config)));

    Ok(Pipeline::new(
        Arc::new(acquirer),
        Arc::new(converter),
        Arc::new(engine_builder(config)),
    ))
}
