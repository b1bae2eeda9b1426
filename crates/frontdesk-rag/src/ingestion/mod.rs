//! Document loading and chunking

mod chunker;
mod parser;

pub use chunker::{chunk, WordChunker};
pub use parser::{normalize_extracted_text, DocumentExtractor, FileExtractor};
