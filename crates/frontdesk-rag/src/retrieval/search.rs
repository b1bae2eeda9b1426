//! Top-k chunk selection

use std::cmp::Reverse;

use crate::config::RetrievalConfig;
use crate::types::Chunk;

use super::scorer::{scorer_for, Scorer, SubstringScorer};

/// A chunk selected for a query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetrievedChunk {
    /// 1-based rank in the result
    pub rank: usize,
    /// Score assigned by the scorer (0 = no match)
    pub score: u32,
    /// The chunk itself
    pub chunk: Chunk,
}

impl RetrievedChunk {
    /// Whether the scorer considered the chunk relevant
    pub fn is_match(&self) -> bool {
        self.score > 0
    }
}

/// Ranks chunks against a query with a pluggable scorer
pub struct Retriever {
    scorer: Box<dyn Scorer>,
    top_k: usize,
}

impl Retriever {
    /// Create a retriever
    pub fn new(scorer: Box<dyn Scorer>, top_k: usize) -> Self {
        Self { scorer, top_k }
    }

    /// Create a retriever from configuration
    pub fn from_config(config: &RetrievalConfig) -> Self {
        Self::new(scorer_for(config.scorer), config.top_k)
    }

    /// Maximum number of chunks returned
    pub fn top_k(&self) -> usize {
        self.top_k
    }

    /// Name of the active scorer
    pub fn scorer_name(&self) -> &'static str {
        self.scorer.name()
    }

    /// Select up to `top_k` chunks for `query`
    pub fn retrieve(&self, query: &str, chunks: &[Chunk]) -> Vec<RetrievedChunk> {
        rank(self.scorer.as_ref(), query, chunks, self.top_k)
    }
}

/// Score every chunk and keep the best `top_k`.
///
/// Higher scores come first. The sort is stable, so chunks with equal
/// scores (including all non-matching ones) stay in document order and fill
/// any remaining slots.
pub fn rank(scorer: &dyn Scorer, query: &str, chunks: &[Chunk], top_k: usize) -> Vec<RetrievedChunk> {
    if top_k == 0 || chunks.is_empty() {
        return Vec::new();
    }

    let mut scored: Vec<(u32, &Chunk)> = chunks
        .iter()
        .map(|chunk| (scorer.score(query, chunk), chunk))
        .collect();
    scored.sort_by_key(|(score, _)| Reverse(*score));

    scored
        .into_iter()
        .take(top_k)
        .enumerate()
        .map(|(i, (score, chunk))| RetrievedChunk {
            rank: i + 1,
            score,
            chunk: chunk.clone(),
        })
        .collect()
}

/// Baseline retrieval: substring matches first, then the rest, each group
/// in document order.
pub fn retrieve(query: &str, chunks: &[Chunk], top_k: usize) -> Vec<Chunk> {
    rank(&SubstringScorer, query, chunks, top_k)
        .into_iter()
        .map(|r| r.chunk)
        .collect()
}
