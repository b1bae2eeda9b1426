//! LLM provider trait for answer generation

use async_trait::async_trait;

use crate::error::Result;

/// Trait for text generation from a fully assembled prompt
///
/// Implementations:
/// - `GeminiClient`: Gemini API `generateContent`
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Send one prompt and return the generated text.
    ///
    /// Failures and timeouts are reported as [`crate::Error::Service`].
    async fn generate(&self, prompt: &str) -> Result<String>;

    /// Get provider name for logging
    fn name(&self) -> &str;

    /// Get the model being used
    fn model(&self) -> &str;
}
