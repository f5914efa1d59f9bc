//! Batch processing command for multiple report files.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use tracing::{debug, error, warn};

use grabber_core::document::AutoSource;
use grabber_core::{ExtractionEngine, ExtractionReport};

use super::output::{format_report, resolve_format, OutputFormat};
use super::{load_config, load_profile};

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Input files or glob pattern
    #[arg(required = true)]
    input: String,

    /// Output directory
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Output format for each file (default from config)
    #[arg(short, long, value_enum)]
    format: Option<OutputFormat>,

    /// Also generate a summary CSV
    #[arg(long)]
    summary: bool,

    /// Number of parallel workers (default from config)
    #[arg(short = 'j', long)]
    jobs: Option<usize>,

    /// Continue on error
    #[arg(long)]
    continue_on_error: bool,

    /// Profile JSON file (overrides the configured profile)
    #[arg(short, long)]
    profile: Option<PathBuf>,
}

/// Result of processing a single file.
struct ProcessResult {
    path: PathBuf,
    report: Option<ExtractionReport>,
    error: Option<String>,
}

pub fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let config = load_config(config_path)?;
    let profile = load_profile(args.profile.as_deref(), &config)?;
    let format = resolve_format(args.format, &config.output)?;
    let continue_on_error = args.continue_on_error || config.batch.continue_on_error;
    let jobs = args.jobs.unwrap_or(config.batch.jobs).max(1);

    // Expand glob pattern
    let mut files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| AutoSource::supports(p))
        .collect();
    files.sort();

    if files.is_empty() {
        anyhow::bail!("No matching files found for pattern: {}", args.input);
    }

    eprintln!(
        "{} Found {} files to process",
        style("ℹ").blue(),
        files.len()
    );

    if let Some(ref output_dir) = args.output_dir {
        fs::create_dir_all(output_dir)?;
    }

    let overall_pb = ProgressBar::new(files.len() as u64);
    overall_pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")?
            .progress_chars("=>-"),
    );

    // The compiled profile is read-only; every worker scans against the same copy
    let engine = ExtractionEngine::shared(Arc::new(profile));
    let source = AutoSource::new(config.pdf_source());

    let pool = rayon::ThreadPoolBuilder::new().num_threads(jobs).build()?;
    debug!("Processing {} files on {} workers", files.len(), jobs);

    let results: Vec<ProcessResult> = pool.install(|| {
        files
            .par_iter()
            .map(|path| {
                let result = match engine.run_document(&source, path) {
                    Ok(report) => ProcessResult {
                        path: path.clone(),
                        report: Some(report),
                        error: None,
                    },
                    Err(e) => {
                        warn!("Failed to process {}: {}", path.display(), e);
                        ProcessResult {
                            path: path.clone(),
                            report: None,
                            error: Some(e.to_string()),
                        }
                    }
                };
                overall_pb.inc(1);
                result
            })
            .collect()
    });

    overall_pb.finish_with_message("Complete");

    let successful: Vec<_> = results.iter().filter(|r| r.report.is_some()).collect();
    let failed: Vec<_> = results.iter().filter(|r| r.error.is_some()).collect();

    if !continue_on_error {
        if let Some(first) = failed.first() {
            let error_msg = first.error.as_deref().unwrap_or("unknown error");
            error!("Failed to process {}: {}", first.path.display(), error_msg);
            anyhow::bail!("Processing failed: {}", error_msg);
        }
    }

    for result in &successful {
        if let (Some(report), Some(output_dir)) = (&result.report, &args.output_dir) {
            let output_name = result
                .path
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("report");

            let output_path = output_dir.join(format!("{}.{}", output_name, format.extension()));
            let content = format_report(report, format, &config.output)?;

            fs::write(&output_path, content)?;
            debug!("Wrote output to {}", output_path.display());
        }
    }

    if args.summary {
        let summary_path = args
            .output_dir
            .as_ref()
            .map(|d| d.join("summary.csv"))
            .unwrap_or_else(|| PathBuf::from("summary.csv"));

        write_summary(&summary_path, &results)?;
        eprintln!(
            "{} Summary written to {}",
            style("✓").green(),
            summary_path.display()
        );
    }

    eprintln!();
    eprintln!(
        "{} Processed {} files in {:?}",
        style("✓").green(),
        results.len(),
        start.elapsed()
    );
    eprintln!(
        "   {} successful, {} failed",
        style(successful.len()).green(),
        style(failed.len()).red()
    );

    if !failed.is_empty() {
        eprintln!();
        eprintln!("{}", style("Failed files:").red());
        for result in &failed {
            eprintln!(
                "  - {}: {}",
                result.path.display(),
                result.error.as_deref().unwrap_or("unknown error")
            );
        }
    }

    Ok(())
}

/// One row per file: status, timing, then every profile field.
fn write_summary(path: &Path, results: &[ProcessResult]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    let field_names: Vec<String> = results
        .iter()
        .find_map(|r| r.report.as_ref())
        .map(|report| report.record.field_names().map(str::to_string).collect())
        .unwrap_or_default();

    let mut header = vec![
        "filename".to_string(),
        "status".to_string(),
        "processing_time_ms".to_string(),
        "error".to_string(),
    ];
    header.extend(field_names.iter().cloned());
    wtr.write_record(&header)?;

    for result in results {
        let filename = result
            .path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("")
            .to_string();

        let mut row = vec![filename];
        match &result.report {
            Some(report) => {
                row.push("success".to_string());
                row.push(report.processing_time_ms.to_string());
                row.push(String::new());
                row.extend(
                    field_names
                        .iter()
                        .map(|name| report.record.value(name).unwrap_or_default().to_string()),
                );
            }
            None => {
                row.push("error".to_string());
                row.push(String::new());
                row.push(result.error.clone().unwrap_or_default());
                row.extend(field_names.iter().map(|_| String::new()));
            }
        }
        wtr.write_record(&row)?;
    }

    wtr.flush()?;
    Ok(())
}
