//! Profile-driven extraction over a whole document.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use serde::Serialize;
use tracing::{debug, info};

use crate::document::DocumentSource;
use crate::error::Result;
use crate::models::record::{ExtractionRecord, FieldValue, UnknownReason};
use crate::profile::ExtractionProfile;

use super::scanner::scan_field;

/// Result of extracting one document.
#[derive(Debug, Clone, Serialize)]
pub struct ExtractionReport {
    /// Source document path.
    pub path: PathBuf,
    /// Metadata reported by the document source.
    pub metadata: BTreeMap<String, String>,
    /// Extracted fields.
    pub record: ExtractionRecord,
    /// Fields found with conflicting values.
    pub warnings: Vec<String>,
    /// Processing time in milliseconds.
    pub processing_time_ms: u64,
}

/// Scan every field of `profile` against `text`.
pub fn run(profile: &ExtractionProfile, text: &str) -> ExtractionRecord {
    let mut record = ExtractionRecord::new();

    for (name, spec) in profile.fields() {
        let value = scan_field(spec, text);
        debug!(field = name, value = %value, "Scanned field");
        record.insert(name, value);
    }

    record
}

/// Extraction engine bound to one profile.
#[derive(Debug, Clone)]
pub struct ExtractionEngine {
    profile: Arc<ExtractionProfile>,
}

impl ExtractionEngine {
    pub fn new(profile: ExtractionProfile) -> Self {
        Self::shared(Arc::new(profile))
    }

    /// Engine over a profile shared with other engines or threads.
    pub fn shared(profile: Arc<ExtractionProfile>) -> Self {
        Self { profile }
    }

    pub fn profile(&self) -> &ExtractionProfile {
        &self.profile
    }

    /// Extract all profile fields from already materialized text.
    pub fn run(&self, text: &str) -> ExtractionRecord {
        info!(
            "Scanning {} fields over {} characters of text",
            self.profile.len(),
            text.chars().count()
        );

        let record = run(&self.profile, text);

        info!(
            "Resolved {}/{} fields",
            record.known_count(),
            record.len()
        );
        record
    }

    /// Load a document through `source` and extract it.
    ///
    /// Ingestion failures are returned as errors; nothing is scanned for a
    /// document that could not be loaded.
    pub fn run_document(&self, source: &dyn DocumentSource, path: &Path) -> Result<ExtractionReport> {
        let start = Instant::now();

        let document = source.load(path)?;
        debug!(
            "Loaded {} ({} metadata entries)",
            path.display(),
            document.metadata.len()
        );

        let record = self.run(&document.content);
        let warnings = record
            .iter()
            .filter(|(_, value)| **value == FieldValue::Unknown(UnknownReason::Ambiguous))
            .map(|(name, _)| format!("Conflicting values found for {}", name))
            .collect();

        Ok(ExtractionReport {
            path: path.to_path_buf(),
            metadata: document.metadata,
            record,
            warnings,
            processing_time_ms: start.elapsed().as_millis() as u64,
        })
    }
}
