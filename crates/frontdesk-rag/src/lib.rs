//! frontdesk-rag: receptionist-style question answering over a single document
//!
//! The document is extracted and split into overlapping word windows once at
//! startup. Each question ranks those chunks (matching chunks first, document
//! order otherwise), fills a persona prompt with the best ones, and asks a
//! hosted LLM for the answer.

pub mod config;
pub mod engine;
pub mod error;
pub mod generation;
pub mod ingestion;
pub mod providers;
pub mod retrieval;
pub mod server;
pub mod types;

pub use config::RagConfig;
pub use engine::RagEngine;
pub use error::{Error, Result};
pub use generation::{PersonaTemplate, PromptBuilder};
pub use ingestion::chunk;
pub use retrieval::retrieve;
pub use types::{
    document::{Chunk, Document},
    query::QueryRequest,
    response::QueryOutcome,
};
