//! Core library for financial report field extraction.
//!
//! This crate provides:
//! - Extraction profiles (keyword tables and row patterns per field)
//! - Field scanning with strict ambiguity resolution
//! - Numeric row extraction for tabular report lines
//! - Document ingestion (PDF and plain text)

pub mod error;
pub mod models;
pub mod profile;
pub mod extraction;
pub mod document;

pub use error::{GrabberError, Result};
pub use models::record::{ExtractionRecord, FieldValue, UnknownReason};
pub use profile::{ColumnRule, ExtractionProfile, FieldSpec, KeywordSpec, PatternSpec, ProfileConfig};
pub use extraction::{ExtractionEngine, ExtractionReport, extract_value, scan_field};
pub use document::{AutoSource, Document, DocumentSource, PdfSource, TextSource};
