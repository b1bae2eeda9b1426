//! Generation service abstractions
//!
//! The pipeline talks to the hosted model through [`LlmProvider`] so tests
//! and alternative backends can stand in for the Gemini API.

pub mod gemini;
pub mod llm;

pub use gemini::GeminiClient;
pub use llm::LlmProvider;
