//! Plain text documents.

use std::collections::BTreeMap;
use std::path::Path;

use tracing::debug;

use super::{read_error, Document, DocumentSource, Result};
use crate::error::IngestError;

/// Loads UTF-8 text files as-is.
#[derive(Debug, Clone, Default)]
pub struct TextSource;

impl TextSource {
    pub fn new() -> Self {
        Self
    }
}

impl DocumentSource for TextSource {
    fn load(&self, path: &Path) -> Result<Document> {
        let content = std::fs::read_to_string(path).map_err(|e| read_error(path, e))?;
        if content.trim().is_empty() {
            return Err(IngestError::EmptyDocument(path.display().to_string()));
        }

        debug!("Read {} bytes of text from {}", content.len(), path.display());

        let mut metadata = BTreeMap::new();
        metadata.insert("format".to_string(), "text".to_string());
        metadata.insert("bytes".to_string(), content.len().to_string());

        Ok(Document { metadata, content })
    }
}
