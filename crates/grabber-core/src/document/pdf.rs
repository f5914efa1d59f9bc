//! PDF text and metadata extraction using lopdf and pdf-extract.

use std::collections::BTreeMap;
use std::path::Path;

use lopdf::{Document as PdfDocument, Object};
use tracing::{debug, trace};

use super::{read_error, Document, DocumentSource, Result};
use crate::error::IngestError;

/// PDF document source.
#[derive(Debug, Clone)]
pub struct PdfSource {
    /// Try an empty password on encrypted files.
    decrypt_empty_password: bool,
    /// Minimum non-whitespace characters for a usable text layer.
    min_text_length: usize,
}

impl PdfSource {
    /// Create a new PDF source with default settings.
    pub fn new() -> Self {
        Self {
            decrypt_empty_password: true,
            min_text_length: 50,
        }
    }

    /// Set empty-password decryption.
    pub fn with_empty_password(mut self, enabled: bool) -> Self {
        self.decrypt_empty_password = enabled;
        self
    }

    /// Set the minimum text length.
    pub fn with_min_text_length(mut self, length: usize) -> Self {
        self.min_text_length = length;
        self
    }

    /// Parse PDF bytes into metadata and text.
    pub fn load_bytes(&self, data: &[u8], name: &str) -> Result<Document> {
        let mut doc = PdfDocument::load_mem(data).map_err(|e| IngestError::Parse(e.to_string()))?;

        // pdf-extract needs the decrypted bytes, not the original ones
        let decrypted;
        let raw: &[u8] = if doc.is_encrypted() {
            if !self.decrypt_empty_password || doc.decrypt("").is_err() {
                return Err(IngestError::Encrypted);
            }
            debug!("Decrypted PDF with empty password");

            let mut buffer = Vec::new();
            doc.save_to(&mut buffer)
                .map_err(|e| IngestError::Parse(format!("failed to save decrypted PDF: {}", e)))?;
            decrypted = buffer;
            &decrypted
        } else {
            data
        };

        let page_count = doc.get_pages().len();
        if page_count == 0 {
            return Err(IngestError::NoPages);
        }

        let content = pdf_extract::extract_text_from_mem(raw)
            .map_err(|e| IngestError::TextExtraction(e.to_string()))?;

        let text_len = content.chars().filter(|c| !c.is_whitespace()).count();
        debug!("PDF analysis: {} pages, {} chars text", page_count, text_len);

        if text_len < self.min_text_length {
            // Scanned reports have no text layer; OCR is not part of this pipeline.
            return Err(IngestError::EmptyDocument(name.to_string()));
        }

        let mut metadata = info_metadata(&doc);
        metadata.insert("format".to_string(), "pdf".to_string());
        metadata.insert("pages".to_string(), page_count.to_string());

        Ok(Document { metadata, content })
    }
}

impl Default for PdfSource {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentSource for PdfSource {
    fn load(&self, path: &Path) -> Result<Document> {
        let data = std::fs::read(path).map_err(|e| read_error(path, e))?;
        self.load_bytes(&data, &path.display().to_string())
    }
}

/// String entries of the trailer's Info dictionary, keys lowercased.
fn info_metadata(doc: &PdfDocument) -> BTreeMap<String, String> {
    let mut metadata = BTreeMap::new();

    let Ok(info) = doc.trailer.get(b"Info") else {
        return metadata;
    };
    let Ok((_, Object::Dictionary(dict))) = doc.dereference(info) else {
        return metadata;
    };

    for (key, value) in dict.iter() {
        if let Object::String(bytes, _) = value {
            let key = String::from_utf8_lossy(key).to_lowercase();
            let value = decode_text_string(bytes);
            trace!("Info entry {} = {:?}", key, value);
            if !value.is_empty() {
                metadata.insert(key, value);
            }
        }
    }

    metadata
}

/// Decode a PDF text string: UTF-16BE with BOM, otherwise byte-per-char.
fn decode_text_string(bytes: &[u8]) -> String {
    if let Some(rest) = bytes.strip_prefix(&[0xFE, 0xFF]) {
        let units: Vec<u16> = rest
            .chunks_exact(2)
            .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
            .collect();
        return String::from_utf16_lossy(&units).trim().to_string();
    }

    match std::str::from_utf8(bytes) {
        Ok(s) => s.trim().to_string(),
        Err(_) => bytes.iter().map(|&b| b as char).collect::<String>().trim().to_string(),
    }
}
