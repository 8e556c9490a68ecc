//! Batch recognition and tagging.

use std::path::Path;
use std::process::ExitCode;

use anyhow::Context;
use tokio::runtime::Runtime;

use super::load_config;
use crate::cli::RunArgs;
use crate::error::Error;
use crate::logging;
use crate::pipeline::{self, BatchOrchestrator, BatchReport, BatchSummary};
use crate::scanner::{self, ScanOptions};

/// Recognize every input file and write tagged copies under the target
pub fn cmd_run(config_path: Option<&Path>, args: &RunArgs) -> anyhow::Result<ExitCode> {
    let config = load_config(config_path, |config| args.apply(config))?;

    let source = config
        .paths
        .source
        .clone()
        .context("No source directory: pass --source or set paths.source")?;
    let target = config
        .paths
        .target
        .clone()
        .context("No target directory: pass --target or set paths.target")?;

    if !source.is_dir() {
        return Err(Error::missing_directory(&source).into());
    }
    std::fs::create_dir_all(&target)
        .with_context(|| format!("Failed to create target directory {:?}", target))?;

    logging::init(Some(&config.paths.log_file))?;

    let files = scanner::collect_input_files(
        &source,
        &ScanOptions {
            extension: config.batch.extension.clone(),
            recursive: config.batch.recursive,
            exclude: config.batch.recursive.then(|| target.clone()),
        },
    )
    .with_context(|| format!("Failed to scan {:?}", source))?;

    println!("Source: {:?}", source);
    println!("Target: {:?}", target);
    println!("Found {} file(s)\n", files.len());

    let rt = Runtime::new()?;
    let started_at = chrono::Utc::now();
    let summary = rt.block_on(async {
        let orchestrator = BatchOrchestrator::from_config(&config, &target)?;
        Ok::<_, Error>(orchestrator.run(files).await)
    })?;
    let finished_at = chrono::Utc::now();

    print_summary(&summary);

    if let Some(report_path) = &args.report {
        let report = BatchReport::new(&summary, &source, &target, started_at, finished_at);
        pipeline::write_report(report_path, &report)
            .with_context(|| format!("Failed to write report {:?}", report_path))?;
        println!("Report written to {:?}", report_path);
    }

    if summary.exceeds(config.batch.max_failure_ratio) {
        eprintln!(
            "Error: {:.0}% of files failed (limit {:.0}%)",
            summary.failure_ratio() * 100.0,
            config.batch.max_failure_ratio * 100.0
        );
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}

fn print_summary(summary: &BatchSummary) {
    println!();
    println!("Summary");
    println!("───────");
    println!("Processed: {}", summary.processed());
    println!("  ✓ Tagged:  {}", summary.succeeded);
    if summary.without_art > 0 {
        println!("    (without cover art: {})", summary.without_art);
    }
    println!("  - Skipped: {}", summary.skipped);
    println!("  ✗ Failed:  {}", summary.failed);
}
