//! Error types for the grabber-core library.

use thiserror::Error;

/// Main error type for the grabber library.
#[derive(Error, Debug)]
pub enum GrabberError {
    /// Profile loading or validation error.
    #[error("profile error: {0}")]
    Profile(#[from] ProfileError),

    /// Document ingestion error.
    #[error("ingestion error: {0}")]
    Ingest(#[from] IngestError),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors raised while validating an extraction profile.
#[derive(Error, Debug)]
pub enum ProfileError {
    /// A field has an empty name.
    #[error("field name must not be empty")]
    EmptyFieldName,

    /// A keyword template does not contain exactly one substitution point.
    #[error("template {template:?} of field {field} must contain exactly one {{}} placeholder")]
    Template { field: String, template: String },

    /// A field name or keyword appears more than once.
    #[error("{key:?} is defined more than once")]
    Duplicate { key: String },

    /// A keyword field has keywords but nothing to match them with.
    #[error("keyword field {field} has no templates")]
    MissingTemplates { field: String },

    /// A keyword in the table is empty.
    #[error("field {field} has an empty keyword")]
    EmptyKeyword { field: String },

    /// A pattern failed to compile.
    #[error("invalid pattern {pattern:?} in field {field}: {source}")]
    Pattern {
        field: String,
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// A column rule points past the tokens it selects from.
    #[error("column rule of field {field} selects column {column} from {count} tokens")]
    Column { field: String, count: usize, column: usize },
}

/// Errors related to document ingestion.
#[derive(Error, Debug)]
pub enum IngestError {
    /// Failed to read the document from disk.
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Failed to open/parse the PDF file.
    #[error("failed to parse PDF: {0}")]
    Parse(String),

    /// Failed to extract text from PDF.
    #[error("failed to extract text: {0}")]
    TextExtraction(String),

    /// The PDF is encrypted and cannot be processed.
    #[error("PDF is encrypted")]
    Encrypted,

    /// The PDF is empty or has no pages.
    #[error("PDF has no pages")]
    NoPages,

    /// No text could be recovered from the document.
    #[error("document contains no text: {0}")]
    EmptyDocument(String),

    /// The file extension is not handled by any source.
    #[error("unsupported document format: {0}")]
    UnsupportedFormat(String),
}

/// Result type for the grabber library.
pub type Result<T> = std::result::Result<T, GrabberError>;
