//! Profile command - inspect and validate extraction profiles.

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Args, Subcommand};
use console::style;

use grabber_core::{ExtractionProfile, FieldSpec};

use super::{load_config, load_profile};

/// Arguments for the profile command.
#[derive(Args)]
pub struct ProfileArgs {
    #[command(subcommand)]
    command: ProfileCommand,
}

#[derive(Subcommand)]
enum ProfileCommand {
    /// Print the active profile as JSON
    Show {
        /// Profile JSON file (overrides the configured profile)
        #[arg(short, long)]
        profile: Option<PathBuf>,
    },

    /// Validate a profile file
    Check {
        /// Profile JSON file
        path: PathBuf,
    },

    /// Write the built-in profile to a file as a starting point
    Export(ExportArgs),
}

#[derive(Args)]
struct ExportArgs {
    /// Output path for the profile file
    #[arg(short, long, default_value = "profile.json")]
    output: PathBuf,

    /// Overwrite existing file
    #[arg(long)]
    force: bool,
}

pub fn run(args: ProfileArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    match args.command {
        ProfileCommand::Show { profile } => show_profile(profile, config_path),
        ProfileCommand::Check { path } => check_profile(&path),
        ProfileCommand::Export(export_args) => export_profile(export_args),
    }
}

fn show_profile(override_path: Option<PathBuf>, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let profile = load_profile(override_path.as_deref(), &config)?;

    println!("{}", serde_json::to_string_pretty(&profile.to_config())?);

    Ok(())
}

fn check_profile(path: &Path) -> anyhow::Result<()> {
    let profile = ExtractionProfile::from_file(path)?;

    println!(
        "{} {} is valid ({} fields)",
        style("✓").green(),
        path.display(),
        profile.len()
    );

    for (name, spec) in profile.fields() {
        let description = match spec {
            FieldSpec::Keyword(spec) => format!(
                "keyword, {} keywords x {} templates",
                spec.keywords().len(),
                spec.templates().len()
            ),
            FieldSpec::Pattern(spec) => format!("pattern, {} patterns", spec.patterns().len()),
        };
        let empty = match spec {
            FieldSpec::Keyword(spec) => spec.keywords().is_empty(),
            FieldSpec::Pattern(spec) => spec.patterns().is_empty(),
        };

        if empty {
            println!("  {} {}: {} (always unknown)", style("!").yellow(), name, description);
        } else {
            println!("  - {}: {}", name, description);
        }
    }

    Ok(())
}

fn export_profile(args: ExportArgs) -> anyhow::Result<()> {
    if args.output.exists() && !args.force {
        anyhow::bail!(
            "Profile file already exists at {}. Use --force to overwrite.",
            args.output.display()
        );
    }

    if let Some(parent) = args.output.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let config = ExtractionProfile::builtin()?.to_config();
    fs::write(&args.output, serde_json::to_string_pretty(&config)?)?;

    println!(
        "{} Wrote built-in profile to {}",
        style("✓").green(),
        args.output.display()
    );

    Ok(())
}
