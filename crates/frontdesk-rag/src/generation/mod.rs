//! Persona prompt assembly

pub mod prompt;

pub use prompt::{AssembledPrompt, PersonaTemplate, PromptBuilder, DEFAULT_PERSONA_TEMPLATE};
