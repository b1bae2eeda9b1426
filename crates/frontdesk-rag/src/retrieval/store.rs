//! Process-wide chunk store, written once at startup

use once_cell::sync::OnceCell;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::ingestion::WordChunker;
use crate::types::{Chunk, Document};

/// Immutable, document-ordered chunk sequence.
///
/// Cloning shares the underlying slice.
#[derive(Debug, Clone)]
pub struct ChunkStore {
    source: PathBuf,
    chunks: Arc<[Chunk]>,
}

impl ChunkStore {
    /// Chunk a document. A document that yields no chunks is a load error.
    pub fn build(document: &Document, chunker: &WordChunker) -> Result<Self> {
        let chunks = chunker.chunk(&document.text);
        if chunks.is_empty() {
            return Err(Error::document_load(format!(
                "{} produced no chunks",
                document.source.display()
            )));
        }
        Ok(Self {
            source: document.source.clone(),
            chunks: chunks.into(),
        })
    }

    /// Chunks in document order
    pub fn chunks(&self) -> &[Chunk] {
        &self.chunks
    }

    /// Number of chunks
    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    /// Always false for a built store
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Document the chunks came from
    pub fn source(&self) -> &Path {
        &self.source
    }
}

/// Observable initialization state of a [`StoreSlot`]
#[derive(Debug, Clone, Copy)]
pub enum Readiness<'a> {
    /// Startup has not finished loading the document
    Loading,
    /// Store is built and frozen
    Ready(&'a ChunkStore),
    /// Startup failed; holds the failure message
    Failed(&'a str),
}

/// Write-once holder for the chunk store.
///
/// The outcome of startup loading is recorded exactly once; readers never
/// block and never see a partially built store.
#[derive(Debug, Default)]
pub struct StoreSlot {
    cell: OnceCell<std::result::Result<ChunkStore, String>>,
}

impl StoreSlot {
    /// Create an empty (loading) slot
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the startup outcome. A failed outcome is stored and its error
    /// returned; a second call is rejected.
    pub fn initialize(&self, outcome: Result<ChunkStore>) -> Result<&ChunkStore> {
        let (stored, failure) = match outcome {
            Ok(store) => (Ok(store), None),
            Err(err) => (Err(err.to_string()), Some(err)),
        };
        self.cell
            .set(stored)
            .map_err(|_| Error::internal("chunk store is already initialized"))?;

        match failure {
            Some(err) => Err(err),
            None => self.get(),
        }
    }

    /// Current state
    pub fn readiness(&self) -> Readiness<'_> {
        match self.cell.get() {
            None => Readiness::Loading,
            Some(Ok(store)) => Readiness::Ready(store),
            Some(Err(message)) => Readiness::Failed(message),
        }
    }

    /// The store, or `NotReady`
    pub fn get(&self) -> Result<&ChunkStore> {
        match self.readiness() {
            Readiness::Ready(store) => Ok(store),
            Readiness::Loading => Err(Error::NotReady(
                "the document is still being processed".to_string(),
            )),
            Readiness::Failed(message) => Err(Error::NotReady(format!(
                "loading failed ({}). Please check server logs.",
                message
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn library() -> Document {
        Document::new(
            "library.txt",
            "The library opens at nine. The library closes at five.",
        )
    }

    #[test]
    fn test_build() {
        let store = ChunkStore::build(&library(), &WordChunker::new(6, 1).unwrap()).unwrap();
        assert_eq!(store.len(), 2);
        assert!(!store.is_empty());
        assert_eq!(store.source(), Path::new("library.txt"));
        assert_eq!(store.chunks()[1].text, "The library closes at five.");
    }

    #[test]
    fn test_build_without_words_fails() {
        let doc = Document::new("blank.txt", "   ");
        let result = ChunkStore::build(&doc, &WordChunker::new(6, 1).unwrap());
        assert!(matches!(result, Err(Error::DocumentLoad(_))));
    }

    #[test]
    fn test_slot_lifecycle() {
        let slot = StoreSlot::new();
        assert!(matches!(slot.readiness(), Readiness::Loading));
        assert!(matches!(slot.get(), Err(Error::NotReady(_))));

        let store = ChunkStore::build(&library(), &WordChunker::new(6, 1).unwrap()).unwrap();
        assert_eq!(slot.initialize(Ok(store.clone())).unwrap().len(), 2);
        assert!(matches!(slot.readiness(), Readiness::Ready(s) if s.len() == 2));

        // frozen: a second initialization is rejected and the store is kept
        assert!(matches!(slot.initialize(Ok(store)), Err(Error::Internal(_))));
        assert_eq!(slot.get().unwrap().len(), 2);
    }

    #[test]
    fn test_slot_records_failure() {
        let slot = StoreSlot::new();
        let result = slot.initialize(Err(Error::document_load("missing file")));
        assert!(matches!(result, Err(Error::DocumentLoad(_))));

        assert!(matches!(slot.readiness(), Readiness::Failed(_)));
        match slot.get() {
            Err(Error::NotReady(message)) => assert!(message.contains("missing file")),
            other => panic!("expected NotReady, got {:?}", other),
        }
    }
}
