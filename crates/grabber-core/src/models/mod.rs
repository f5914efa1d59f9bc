//! Data models for extraction results and configuration.

pub mod config;
pub mod record;

pub use config::{BatchConfig, GrabberConfig, OutputConfig, PdfConfig, ProfileSettings};
pub use record::{ExtractionRecord, FieldValue, UnknownReason};
