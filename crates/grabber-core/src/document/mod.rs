//! Document ingestion.
//!
//! Turns a document on disk into metadata plus fully materialized text. The
//! extraction engine only ever sees the text.

mod pdf;
mod text;

pub use pdf::PdfSource;
pub use text::TextSource;

use std::collections::BTreeMap;
use std::path::Path;

use crate::error::IngestError;

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;

/// An ingested document.
#[derive(Debug, Clone, Default)]
pub struct Document {
    /// Source-specific metadata (title, author, page count, ...).
    pub metadata: BTreeMap<String, String>,
    /// Recovered plain text.
    pub content: String,
}

/// Trait for document ingestion implementations.
pub trait DocumentSource: Send + Sync {
    /// Load the document at `path`.
    fn load(&self, path: &Path) -> Result<Document>;
}

/// Picks a source by file extension.
#[derive(Debug, Clone, Default)]
pub struct AutoSource {
    pdf: PdfSource,
    text: TextSource,
}

impl AutoSource {
    pub fn new(pdf: PdfSource) -> Self {
        Self {
            pdf,
            text: TextSource::new(),
        }
    }

    /// Whether `path` has an extension this source can load.
    pub fn supports(path: &Path) -> bool {
        matches!(extension(path).as_str(), "pdf" | "txt" | "text")
    }
}

impl DocumentSource for AutoSource {
    fn load(&self, path: &Path) -> Result<Document> {
        match extension(path).as_str() {
            "pdf" => self.pdf.load(path),
            "txt" | "text" => self.text.load(path),
            other => Err(IngestError::UnsupportedFormat(other.to_string())),
        }
    }
}

fn extension(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase()
}

fn read_error(path: &Path, source: std::io::Error) -> IngestError {
    IngestError::Read {
        path: path.display().to_string(),
        source,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_supports() {
        assert!(AutoSource::supports(Path::new("report.PDF")));
        assert!(AutoSource::supports(Path::new("report.txt")));
        assert!(!AutoSource::supports(Path::new("report.docx")));
        assert!(!AutoSource::supports(Path::new("report")));
    }

    #[test]
    fn test_unsupported_format() {
        let err = AutoSource::default().load(Path::new("report.docx")).unwrap_err();
        assert!(matches!(err, IngestError::UnsupportedFormat(ext) if ext == "docx"));
    }

    #[test]
    fn test_dispatch_to_text() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.TXT");
        std::fs::write(&path, "Выручка 45 000  40 000\n").unwrap();

        let document = AutoSource::default().load(&path).unwrap();
        assert!(document.content.starts_with("Выручка"));
        assert_eq!(document.metadata.get("format").map(String::as_str), Some("text"));
    }
}
