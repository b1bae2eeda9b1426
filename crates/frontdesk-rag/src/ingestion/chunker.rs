//! Word-window chunking with fixed overlap

use crate::config::ChunkingConfig;
use crate::error::{Error, Result};
use crate::types::Chunk;

/// Splits text into overlapping windows of whitespace-delimited words
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WordChunker {
    /// Words per chunk
    chunk_size: usize,
    /// Words shared with the previous chunk
    overlap: usize,
}

impl WordChunker {
    /// Create a new chunker.
    ///
    /// Fails with `InvalidConfiguration` unless `chunk_size > 0` and
    /// `overlap < chunk_size`, so the window always advances.
    pub fn new(chunk_size: usize, overlap: usize) -> Result<Self> {
        if chunk_size == 0 {
            return Err(Error::invalid_config("chunk_size must be greater than zero"));
        }
        if overlap >= chunk_size {
            return Err(Error::invalid_config(format!(
                "overlap ({}) must be smaller than chunk_size ({})",
                overlap, chunk_size
            )));
        }
        Ok(Self { chunk_size, overlap })
    }

    /// Create a chunker from configuration
    pub fn from_config(config: &ChunkingConfig) -> Result<Self> {
        Self::new(config.chunk_size, config.chunk_overlap)
    }

    /// Words the window advances per chunk (always > 0)
    pub fn step(&self) -> usize {
        self.chunk_size - self.overlap
    }

    /// Chunk text into document-ordered chunks.
    ///
    /// The last chunk may hold fewer than `chunk_size` words. Empty or
    /// whitespace-only text yields no chunks.
    pub fn chunk(&self, text: &str) -> Vec<Chunk> {
        let words: Vec<&str> = text.split_whitespace().collect();
        let step = self.step();

        let mut chunks = Vec::with_capacity(words.len().div_ceil(step));
        let mut start = 0usize;

        while start < words.len() {
            let end = (start + self.chunk_size).min(words.len());
            chunks.push(Chunk::from_words(chunks.len(), &words[start..end]));
            start += step;
        }

        chunks
    }
}

/// Chunk `text` into windows of `chunk_size` words sharing `overlap` words
pub fn chunk(text: &str, chunk_size: usize, overlap: usize) -> Result<Vec<Chunk>> {
    Ok(WordChunker::new(chunk_size, overlap)?.chunk(text))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const LIBRARY: &str = "The library opens at nine. The library closes at five.";

    #[test]
    fn test_library_document() {
        let chunks = chunk(LIBRARY, 6, 1).unwrap();

        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].text, "The library opens at nine. The");
        assert_eq!(chunks[0].word_count, 6);
        assert_eq!(chunks[1].text, "The library closes at five.");
        assert_eq!(chunks[1].word_count, 5);
        assert_eq!(chunks[1].index, 1);
    }

    #[test]
    fn test_empty_text() {
        assert!(chunk("", 5, 2).unwrap().is_empty());
        assert!(chunk(" \n\t ", 5, 2).unwrap().is_empty());
    }

    #[test]
    fn test_whitespace_is_normalized() {
        let chunks = chunk("alpha\n\nbravo\tcharlie   delta", 10, 0).unwrap();
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].text, "alpha bravo charlie delta");
    }

    #[test]
    fn test_zero_overlap_partitions() {
        let chunks = chunk("a b c d e f g", 3, 0).unwrap();
        let texts: Vec<&str> = chunks.iter().map(|c| c.text.as_str()).collect();
        assert_eq!(texts, vec!["a b c", "d e f", "g"]);
    }

    #[test]
    fn test_trailing_windows_are_kept() {
        // step 1: every start index below the word count opens a chunk
        let chunks = chunk("a b c d", 3, 2).unwrap();
        let texts: Vec<&str> = chunks.iter().map(|c| c.text.as_str()).collect();
        assert_eq!(texts, vec!["a b c", "b c d", "c d", "d"]);
    }

    #[test]
    fn test_invalid_parameters() {
        assert!(matches!(chunk("a b", 0, 0), Err(Error::InvalidConfiguration(_))));
        assert!(matches!(chunk("a b", 4, 4), Err(Error::InvalidConfiguration(_))));
        assert!(matches!(chunk("a b", 4, 9), Err(Error::InvalidConfiguration(_))));
    }

    #[test]
    fn test_from_config() {
        let chunker = WordChunker::from_config(&ChunkingConfig::default()).unwrap();
        assert_eq!(chunker.step(), 450);
    }

    fn params() -> impl Strategy<Value = (Vec<String>, usize, usize)> {
        (
            prop::collection::vec("[a-zA-Z0-9.,]{1,8}", 0..80),
            1usize..20,
        )
            .prop_flat_map(|(words, size)| (Just(words), Just(size), 0..size))
    }

    proptest! {
        #[test]
        fn prop_leading_words_reconstruct_text((words, size, overlap) in params()) {
            let chunks = chunk(&words.join(" "), size, overlap).unwrap();
            let step = size - overlap;

            let rebuilt: Vec<String> = chunks
                .iter()
                .flat_map(|c| c.words().take(step).map(str::to_string).collect::<Vec<_>>())
                .collect();

            prop_assert_eq!(rebuilt, words.clone());
            prop_assert_eq!(chunks.len(), words.len().div_ceil(step));
        }

        #[test]
        fn prop_consecutive_chunks_share_overlap((words, size, overlap) in params()) {
            let chunks = chunk(&words.join(" "), size, overlap).unwrap();
            let step = size - overlap;

            for pair in chunks.windows(2) {
                prop_assert!(pair[0].word_count <= size);
                prop_assert_eq!(pair[0].index + 1, pair[1].index);
                if pair[0].word_count == size {
                    let tail: Vec<&str> = pair[0].words().skip(step).collect();
                    let head: Vec<&str> = pair[1].words().take(overlap).collect();
                    prop_assert_eq!(tail, head);
                }
            }
        }

        #[test]
        fn prop_chunking_is_deterministic((words, size, overlap) in params()) {
            let text = words.join(" ");
            prop_assert_eq!(chunk(&text, size, overlap).unwrap(), chunk(&text, size, overlap).unwrap());
        }
    }
}
