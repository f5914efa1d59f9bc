//! Scan command - extract fields from a single report.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

use grabber_core::document::AutoSource;
use grabber_core::ExtractionEngine;

use super::output::{format_report, resolve_format, OutputFormat};
use super::{load_config, load_profile};

/// Arguments for the scan command.
#[derive(Args)]
pub struct ScanArgs {
    /// Input file (PDF or text)
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format (default from config)
    #[arg(short, long, value_enum)]
    format: Option<OutputFormat>,

    /// Profile JSON file (overrides the configured profile)
    #[arg(short, long)]
    profile: Option<PathBuf>,

    /// Exit with an error if any field is unknown
    #[arg(long)]
    strict: bool,
}

pub fn run(args: ScanArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let config = load_config(config_path)?;
    let profile = load_profile(args.profile.as_deref(), &config)?;
    let format = resolve_format(args.format, &config.output)?;

    // Check input file exists
    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    if !AutoSource::supports(&args.input) {
        anyhow::bail!("Unsupported file format: {}", args.input.display());
    }

    info!("Processing file: {}", args.input.display());

    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} [{elapsed_precise}] {msg}")?);
    pb.set_message("Extracting fields...");

    let engine = ExtractionEngine::new(profile);
    let source = AutoSource::new(config.pdf_source());
    let report = engine.run_document(&source, &args.input)?;

    pb.finish_and_clear();

    let output = format_report(&report, format, &config.output)?;

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        eprintln!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    for warning in &report.warnings {
        eprintln!("{} {}", style("!").yellow(), warning);
    }

    debug!("Total processing time: {:?}", start.elapsed());

    let unknown: Vec<&str> = report
        .record
        .iter()
        .filter(|(_, value)| value.is_unknown())
        .map(|(name, _)| name)
        .collect();

    if args.strict && !unknown.is_empty() {
        anyhow::bail!("Could not determine: {}", unknown.join(", "));
    }

    Ok(())
}
