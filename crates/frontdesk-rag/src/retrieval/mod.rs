//! Chunk scoring, ranking and the shared chunk store

pub mod scorer;
pub mod search;
pub mod store;

pub use scorer::{scorer_for, Scorer, SubstringScorer, TokenOverlapScorer};
pub use search::{rank, retrieve, RetrievedChunk, Retriever};
pub use store::{ChunkStore, Readiness, StoreSlot};
