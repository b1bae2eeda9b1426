//! Document and chunk types

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Full plain-text content of the source file, as extracted at startup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// File the text was extracted from
    pub source: PathBuf,
    /// Extracted text
    pub text: String,
}

impl Document {
    /// Create a new document
    pub fn new(source: impl Into<PathBuf>, text: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            text: text.into(),
        }
    }

    /// Number of whitespace-delimited words
    pub fn word_count(&self) -> usize {
        self.text.split_whitespace().count()
    }
}

/// A contiguous run of words from the document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    /// Position in document order (0-based)
    pub index: usize,
    /// Number of words in `text`
    pub word_count: usize,
    /// Words joined by single spaces
    pub text: String,
}

impl Chunk {
    /// Create a chunk from its words
    pub fn from_words(index: usize, words: &[&str]) -> Self {
        Self {
            index,
            word_count: words.len(),
            text: words.join(" "),
        }
    }

    /// Iterate over the chunk's words
    pub fn words(&self) -> impl Iterator<Item = &str> {
        self.text.split_whitespace()
    }
}
