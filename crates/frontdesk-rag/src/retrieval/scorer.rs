//! Relevance scoring functions

use std::collections::HashSet;

use crate::config::ScorerKind;
use crate::types::Chunk;

/// Scores how relevant a chunk is to a query.
///
/// Higher is better; zero means "does not match". Implementations must be
/// pure functions of `(query, chunk)`.
pub trait Scorer: Send + Sync {
    /// Score one chunk
    fn score(&self, query: &str, chunk: &Chunk) -> u32;

    /// Scorer name for logging
    fn name(&self) -> &'static str;
}

/// Boolean case-insensitive substring match of the whole query
#[derive(Debug, Clone, Copy, Default)]
pub struct SubstringScorer;

impl Scorer for SubstringScorer {
    fn score(&self, query: &str, chunk: &Chunk) -> u32 {
        if query.is_empty() {
            return 0;
        }
        u32::from(chunk.text.to_lowercase().contains(&query.to_lowercase()))
    }

    fn name(&self) -> &'static str {
        "substring"
    }
}

/// Number of distinct query words that also appear as words of the chunk
#[derive(Debug, Clone, Copy, Default)]
pub struct TokenOverlapScorer;

impl Scorer for TokenOverlapScorer {
    fn score(&self, query: &str, chunk: &Chunk) -> u32 {
        let query_terms = terms(query);
        if query_terms.is_empty() {
            return 0;
        }
        let chunk_terms = terms(&chunk.text);
        query_terms.intersection(&chunk_terms).count() as u32
    }

    fn name(&self) -> &'static str {
        "token_overlap"
    }
}

/// Lower-cased words with surrounding punctuation stripped
fn terms(text: &str) -> HashSet<String> {
    text.split_whitespace()
        .map(|w| w.trim_matches(|c: char| !c.is_alphanumeric()).to_lowercase())
        .filter(|w| !w.is_empty())
        .collect()
}

/// Build the scorer selected in configuration
pub fn scorer_for(kind: ScorerKind) -> Box<dyn Scorer> {
    match kind {
        ScorerKind::Substring => Box::new(SubstringScorer),
        ScorerKind::TokenOverlap => Box::new(TokenOverlapScorer),
    }
}
