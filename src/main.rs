//! lint-sweep: batch linter runner
//!
//! Loads configuration, runs the pipeline and prints the report to stdout.
//! Logs go to stderr.

use anyhow::{Context, Result};
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Instant;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use lint_sweep::config::ReportFormat;
use lint_sweep::{Pipeline, PipelineConfig, RunReport};

/// Initialize logging with RUST_LOG environment variable support
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

fn print_report(report: &RunReport, format: ReportFormat) -> Result<()> {
    match format {
        ReportFormat::Text => println!("{}", report),
        ReportFormat::Json => println!("{}", report.to_json().context("serializing report")?),
    }
    Ok(())
}

async fn run() -> Result<()> {
    let project_root = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let config = PipelineConfig::load(Some(&project_root)).context("loading configuration")?;
    let format = config.report.format;

    let pipeline = Pipeline::new(Arc::new(config));

    // Run with Ctrl+C signal handling; dropping the run kills its subprocesses
    let report = tokio::select! {
        res = pipeline.run() => res?,
        _ = tokio::signal::ctrl_c() => {
            tracing::warn!("Received Ctrl+C, aborting run");
            anyhow::bail!("interrupted");
        }
    };

    print_report(&report, format)
}

#[tokio::main]
async fn main() -> ExitCode {
    init_logging();

    let start = Instant::now();
    let result = run().await;
    tracing::info!("finish: executed in {:.2?}", start.elapsed());

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
