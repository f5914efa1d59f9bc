//! CLI subcommands.

pub mod batch;
pub mod config;
pub mod output;
pub mod profile;
pub mod scan;

use std::path::{Path, PathBuf};

use grabber_core::models::config::GrabberConfig;
use grabber_core::ExtractionProfile;
use tracing::debug;

/// Default location of the configuration file.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("grabber")
        .join("config.json")
}

/// Load the explicit config file, else the default one if present, else defaults.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<GrabberConfig> {
    if let Some(path) = config_path {
        return Ok(GrabberConfig::from_file(Path::new(path))?);
    }

    let default_path = default_config_path();
    if default_path.exists() {
        debug!("Using config file {}", default_path.display());
        Ok(GrabberConfig::from_file(&default_path)?)
    } else {
        Ok(GrabberConfig::default())
    }
}

/// Profile from `--profile`, else from configuration.
pub fn load_profile(
    override_path: Option<&Path>,
    config: &GrabberConfig,
) -> anyhow::Result<ExtractionProfile> {
    let profile = match override_path {
        Some(path) => ExtractionProfile::from_file(path)?,
        None => config.load_profile()?,
    };
    debug!("Using profile with {} fields", profile.len());
    Ok(profile)
}
