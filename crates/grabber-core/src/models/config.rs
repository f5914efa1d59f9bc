//! Configuration structures for the extraction pipeline.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::document::PdfSource;
use crate::error::Result;
use crate::profile::ExtractionProfile;

/// Main configuration for the grabber pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GrabberConfig {
    /// Extraction profile selection.
    pub profile: ProfileSettings,

    /// PDF ingestion configuration.
    pub pdf: PdfConfig,

    /// Batch processing configuration.
    pub batch: BatchConfig,

    /// Output configuration.
    pub output: OutputConfig,
}

/// Which extraction profile to use.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileSettings {
    /// Path to a profile JSON file. The built-in report profile is used when unset.
    pub path: Option<PathBuf>,
}

/// PDF ingestion configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PdfConfig {
    /// Try an empty password on encrypted PDFs.
    pub decrypt_empty_password: bool,

    /// Minimum number of non-whitespace characters for a usable text layer.
    pub min_text_length: usize,
}

impl Default for PdfConfig {
    fn default() -> Self {
        Self {
            decrypt_empty_password: true,
            min_text_length: 50,
        }
    }
}

/// Batch processing configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    /// Number of parallel workers.
    pub jobs: usize,

    /// Keep going when a document fails to load.
    pub continue_on_error: bool,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            jobs: 4,
            continue_on_error: false,
        }
    }
}

/// Output configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Format used when `--format` is not given: "json", "csv" or "text".
    pub default_format: String,

    /// Pretty-print JSON output.
    pub pretty_json: bool,

    /// Marker printed for unknown fields in text output.
    pub unknown_marker: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            default_format: "json".to_string(),
            pretty_json: true,
            unknown_marker: "unknown".to_string(),
        }
    }
}

impl GrabberConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Load the configured profile, or the built-in one.
    pub fn load_profile(&self) -> Result<ExtractionProfile> {
        match &self.profile.path {
            Some(path) => ExtractionProfile::from_file(path),
            None => Ok(ExtractionProfile::builtin()?),
        }
    }

    /// PDF source configured from the `pdf` section.
    pub fn pdf_source(&self) -> PdfSource {
        PdfSource::new()
            .with_empty_password(self.pdf.decrypt_empty_password)
            .with_min_text_length(self.pdf.min_text_length)
    }
}
