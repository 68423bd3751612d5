//! model-forge: build a TensorRT engine for a named detector.
//!
//! Exit status is 0 when every artifact exists at the end of the run and
//! non-zero on any failure; the cause is only reported in the log.

use anyhow::Result;
use clap::Parser;
use forge_cli::{stages, CliArgs, Command, ForgeConfig};
use forge_pipeline::{Pipeline, StageOutcome};
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args = CliArgs::parse();

    // Logs go to stderr so `--json` output on stdout stays parseable.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| args.log_level.as_str().into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match run(&args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(args: &CliArgs) -> Result<()> {
    let config = ForgeConfig::load(args)?;

    match args.command() {
        Command::Run => build(&config, args.json).await,
        Command::Plan => plan(&config, args.json),
        Command::Probe => {
            let builder = stages::engine_builder(&config);
            let version = builder.probe().await?;
            info!("{} is available", builder.executable());
            println!("{}", version);
            Ok(())
        }
    }
}

async fn build(config: &ForgeConfig, json: bool) -> Result<()> {
    let pipeline_config = config.pipeline_config()?;
    let pipeline = stages::build_pipeline(config)?;

    info!("Starting model-forge v{}", env!("CARGO_PKG_VERSION"));
    let report = pipeline.run(&pipeline_config).await?;

    for stage in &report.stages {
        match stage.outcome {
            StageOutcome::Ran => info!(
                "  {:<8} ran      {:>7.1}s  {}",
                stage.stage,
                stage.elapsed_secs,
                stage.path.display()
            ),
            StageOutcome::Skipped => info!(
                "  {:<8} cached            {}",
                stage.stage,
                stage.path.display()
            ),
        }
    }

    if report.is_fully_cached() {
        info!("All artifacts already present");
    } else {
        info!("Finished in {:.1}s", report.total_elapsed().as_secs_f64());
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else if let Some(engine) = report.engine() {
        println!("{}", engine.display());
    }
    Ok(())
}

fn plan(config: &ForgeConfig, json: bool) -> Result<()> {
    let plan = Pipeline::plan(&config.pipeline_config()?);

    if json {
        println!("{}", serde_json::to_string_pretty(&plan)?);
        return Ok(());
    }

    for step in &plan {
        let action = match step.outcome {
            StageOutcome::Ran => "run",
            StageOutcome::Skipped => "skip",
        };
        println!("{:<8} {:<5} {}", step.stage, action, step.output.display());
    }
    Ok(())
}
