//! Document text extraction

use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use crate::error::{Error, Result};
use crate::types::Document;

/// Upper bound for a single pdf-extract run before falling back to lopdf
const PDF_EXTRACT_TIMEOUT: Duration = Duration::from_secs(60);

/// Converts a source document into plain text.
///
/// Called once at startup; any error is fatal to startup.
pub trait DocumentExtractor: Send + Sync {
    /// Extract the text of `source`
    fn extract_text(&self, source: &Path) -> Result<String>;

    /// Extract and wrap as a [`Document`], rejecting documents without text
    fn load(&self, source: &Path) -> Result<Document> {
        let text = self.extract_text(source)?;
        if text.trim().is_empty() {
            return Err(Error::document_load(format!(
                "No text content could be extracted from {}",
                source.display()
            )));
        }
        Ok(Document::new(source, text))
    }
}

/// Extractor for PDF and plain-text files on the local filesystem
#[derive(Debug, Clone, Copy, Default)]
pub struct FileExtractor;

impl FileExtractor {
    /// Create a new extractor
    pub fn new() -> Self {
        Self
    }

    /// Resolve the configured path to a file.
    ///
    /// A directory resolves to the first `.pdf` inside it, by file name.
    pub fn resolve_source(path: &Path) -> Result<PathBuf> {
        if !path.exists() {
            return Err(Error::document_load(format!(
                "Document not found at {}. Please add it before starting.",
                path.display()
            )));
        }
        if path.is_file() {
            return Ok(path.to_path_buf());
        }

        let mut pdfs: Vec<PathBuf> = std::fs::read_dir(path)
            .map_err(|e| Error::document_load(format!("Cannot read {}: {}", path.display(), e)))?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| p.is_file() && extension_of(p) == "pdf")
            .collect();
        pdfs.sort();

        pdfs.into_iter().next().ok_or_else(|| {
            Error::document_load(format!("No PDF file found in {}", path.display()))
        })
    }

    /// Extract PDF text with a timeout, falling back to lopdf
    fn extract_pdf(data: Vec<u8>) -> Result<String> {
        let (tx, rx) = mpsc::channel();
        let worker_data = data.clone();

        // pdf-extract can hang or panic on unusual fonts; keep it off this thread
        let handle = thread::spawn(move || {
            let _ = tx.send(pdf_extract::extract_text_from_mem(&worker_data));
        });

        match rx.recv_timeout(PDF_EXTRACT_TIMEOUT) {
            Ok(Ok(text)) => {
                let _ = handle.join();
                Ok(text)
            }
            Ok(Err(e)) => {
                let _ = handle.join();
                tracing::warn!("pdf-extract failed: {}, trying fallback", e);
                Self::extract_pdf_fallback(&data)
            }
            Err(mpsc::RecvTimeoutError::Timeout) => {
                tracing::error!(
                    "PDF extraction timed out after {:?}, trying fallback",
                    PDF_EXTRACT_TIMEOUT
                );
                Self::extract_pdf_fallback(&data)
            }
            Err(mpsc::RecvTimeoutError::Disconnected) => {
                tracing::error!("PDF extraction thread crashed, trying fallback");
                Self::extract_pdf_fallback(&data)
            }
        }
    }

    /// Page-by-page extraction using lopdf directly
    fn extract_pdf_fallback(data: &[u8]) -> Result<String> {
        let doc = lopdf::Document::load_mem(data)
            .map_err(|e| Error::document_load(format!("Failed to load PDF: {}", e)))?;

        let mut pages = Vec::new();
        for page_number in doc.get_pages().keys() {
            match doc.extract_text(&[*page_number]) {
                Ok(text) if !text.trim().is_empty() => pages.push(text),
                Ok(_) => {}
                Err(e) => tracing::debug!("Could not extract page {}: {}", page_number, e),
            }
        }

        if pages.is_empty() {
            tracing::warn!("Fallback extraction produced no text, PDF may be image-based or encrypted");
            return Err(Error::document_load(
                "PDF appears to be image-based or has no extractable text",
            ));
        }

        Ok(pages.join("\n"))
    }

    /// Read a text file, tolerating invalid UTF-8
    fn read_text(path: &Path) -> Result<String> {
        let bytes = std::fs::read(path)
            .map_err(|e| Error::document_load(format!("Cannot read {}: {}", path.display(), e)))?;
        Ok(match String::from_utf8(bytes) {
            Ok(text) => text,
            Err(e) => String::from_utf8_lossy(e.as_bytes()).into_owned(),
        })
    }
}

impl DocumentExtractor for FileExtractor {
    fn extract_text(&self, source: &Path) -> Result<String> {
        let path = Self::resolve_source(source)?;
        tracing::info!("Extracting text from {}", path.display());

        let raw = match extension_of(&path).as_str() {
            "pdf" => {
                let data = std::fs::read(&path).map_err(|e| {
                    Error::document_load(format!("Cannot read {}: {}", path.display(), e))
                })?;
                Self::extract_pdf(data)?
            }
            "txt" | "md" | "text" => Self::read_text(&path)?,
            other => {
                return Err(Error::document_load(format!(
                    "Unsupported document type '{}' for {}",
                    other,
                    path.display()
                )))
            }
        };

        Ok(normalize_extracted_text(&raw))
    }
}

/// Lower-cased file extension, or an empty string
fn extension_of(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default()
}

/// Replace ligatures and odd spacing that PDF fonts leave behind, and drop
/// blank lines.
pub fn normalize_extracted_text(text: &str) -> String {
    text.replace('\0', "")
        .replace('\u{00A0}', " ")
        .replace('\u{FB00}', "ff")
        .replace('\u{FB01}', "fi")
        .replace('\u{FB02}', "fl")
        .replace('\u{FB03}', "ffi")
        .replace('\u{FB04}', "ffl")
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
