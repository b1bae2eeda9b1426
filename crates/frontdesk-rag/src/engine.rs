//! Question answering over the loaded document

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use uuid::Uuid;

use crate::config::RagConfig;
use crate::error::{Error, Result};
use crate::generation::{PersonaTemplate, PromptBuilder};
use crate::ingestion::{DocumentExtractor, WordChunker};
use crate::providers::LlmProvider;
use crate::retrieval::{ChunkStore, Readiness, Retriever, StoreSlot};
use crate::types::QueryOutcome;

/// Retrieval-augmented answering over a single document.
///
/// Built from validated configuration, loaded once, then shared read-only
/// across requests.
pub struct RagEngine {
    chunker: WordChunker,
    retriever: Retriever,
    template: PersonaTemplate,
    store: StoreSlot,
    llm: Arc<dyn LlmProvider>,
    max_prompt_chars: Option<usize>,
}

impl RagEngine {
    /// Create an engine with an empty (loading) store
    pub fn new(config: &RagConfig, llm: Arc<dyn LlmProvider>) -> Result<Self> {
        let chunker = WordChunker::from_config(&config.chunking)?;
        let template = PersonaTemplate::parse(&config.persona.template)?;
        config.llm.validate()?;

        Ok(Self {
            chunker,
            retriever: Retriever::from_config(&config.retrieval),
            template,
            store: StoreSlot::new(),
            llm,
            max_prompt_chars: config.llm.max_prompt_chars,
        })
    }

    /// Extract and chunk the document, then freeze the store.
    ///
    /// Returns the chunk count. On failure the store is marked failed and
    /// the error is returned; callers treat it as fatal.
    pub fn load_document(&self, extractor: &dyn DocumentExtractor, source: &Path) -> Result<usize> {
        let start = Instant::now();
        let outcome = extractor
            .load(source)
            .and_then(|document| ChunkStore::build(&document, &self.chunker));

        match self.store.initialize(outcome) {
            Ok(store) => {
                tracing::info!(
                    "Loaded document and extracted {} chunks ({} in {}ms)",
                    store.len(),
                    store.source().display(),
                    start.elapsed().as_millis()
                );
                Ok(store.len())
            }
            Err(e) => {
                tracing::error!("Failed to load {}: {}", source.display(), e);
                Err(e)
            }
        }
    }

    /// Current store state
    pub fn readiness(&self) -> Readiness<'_> {
        self.store.readiness()
    }

    /// Retriever in use
    pub fn retriever(&self) -> &Retriever {
        &self.retriever
    }

    /// Generation provider in use
    pub fn llm(&self) -> &dyn LlmProvider {
        self.llm.as_ref()
    }

    /// Answer a question from the document.
    ///
    /// Never fails: not-ready, oversized prompts and generation failures come
    /// back as an error payload.
    pub async fn answer_question(&self, query: &str) -> QueryOutcome {
        let query_id = Uuid::new_v4();
        let start = Instant::now();
        tracing::info!(%query_id, "Query: \"{}\"", query);

        let result = self.try_answer(query_id, query).await;
        match &result {
            Ok(answer) => tracing::info!(
                %query_id,
                "Query completed in {}ms ({} chars)",
                start.elapsed().as_millis(),
                answer.len()
            ),
            Err(e) => tracing::warn!(%query_id, kind = e.kind(), "Query failed: {}", e),
        }

        QueryOutcome::from(result)
    }

    async fn try_answer(&self, query_id: Uuid, query: &str) -> Result<String> {
        let store = self.store.get()?;

        let retrieved = self.retriever.retrieve(query, store.chunks());
        for r in &retrieved {
            tracing::debug!(
                %query_id,
                rank = r.rank,
                score = r.score,
                chunk = r.chunk.index,
                scorer = self.retriever.scorer_name(),
                "Retrieved chunk"
            );
        }

        let prompt = PromptBuilder::assemble(&self.template, retrieved.iter().map(|r| &r.chunk), query);
        if let Some(limit) = self.max_prompt_chars.filter(|&limit| prompt.exceeds(limit)) {
            return Err(Error::PromptTooLarge {
                length: prompt.char_len(),
                limit,
            });
        }

        tracing::debug!(
            %query_id,
            "Sending {} chars with {} chunks to {} ({})",
            prompt.char_len(),
            prompt.context_chunks,
            self.llm.name(),
            self.llm.model()
        );

        let answer = self.llm.generate(&prompt.text).await?;
        Ok(answer.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingestion::FileExtractor;
    use async_trait::async_trait;
    use std::sync::Mutex;

    const LIBRARY: &str = "The library opens at nine. The library closes at five.";

    /// Records prompts and replies with a canned answer or failure
    struct FakeLlm {
        reply: std::result::Result<String, String>,
        prompts: Mutex<Vec<String>>,
    }

    impl FakeLlm {
        fn answering(text: &str) -> Arc<Self> {
            Arc::new(Self {
                reply: Ok(text.to_string()),
                prompts: Mutex::new(Vec::new()),
            })
        }

        fn failing(message: &str) -> Arc<Self> {
            Arc::new(Self {
                reply: Err(message.to_string()),
                prompts: Mutex::new(Vec::new()),
            })
        }

        fn prompts(&self) -> Vec<String> {
            self.prompts.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl LlmProvider for FakeLlm {
        async fn generate(&self, prompt: &str) -> Result<String> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            self.reply.clone().map_err(Error::service)
        }

        fn name(&self) -> &str {
            "fake"
        }

        fn model(&self) -> &str {
            "fake-model"
        }
    }

    /// Extractor serving fixed text, or failing
    struct StaticExtractor(Option<&'static str>);

    impl DocumentExtractor for StaticExtractor {
        fn extract_text(&self, source: &Path) -> Result<String> {
            self.0.map(str::to_string).ok_or_else(|| {
                Error::document_load(format!("Document not found at {}", source.display()))
            })
        }
    }

    fn library_config() -> RagConfig {
        let mut config = RagConfig::default();
        config.chunking.chunk_size = 6;
        config.chunking.chunk_overlap = 1;
        config.persona.template = "Context:\n{context}\nQuestion: {question}\nAnswer:".to_string();
        config
    }

    fn loaded_engine(llm: Arc<FakeLlm>) -> RagEngine {
        let engine = RagEngine::new(&library_config(), llm).unwrap();
        let count = engine
            .load_document(&StaticExtractor(Some(LIBRARY)), Path::new("library.txt"))
            .unwrap();
        assert_eq!(count, 2);
        engine
    }

    #[tokio::test]
    async fn test_answer_library_question() {
        let llm = FakeLlm::answering("  We close at five.\n");
        let engine = loaded_engine(llm.clone());

        let outcome = engine.answer_question("closes").await;
        assert_eq!(outcome.answer_text(), Some("We close at five."));

        let prompts = llm.prompts();
        assert_eq!(prompts.len(), 1);
        assert_eq!(
            prompts[0],
            "Context:\nThe library closes at five.\n\nThe library opens at nine. The\nQuestion: closes\nAnswer:"
        );
    }

    #[tokio::test]
    async fn test_query_before_load_is_not_ready() {
        let llm = FakeLlm::answering("unused");
        let engine = RagEngine::new(&library_config(), llm.clone()).unwrap();
        assert!(matches!(engine.readiness(), Readiness::Loading));

        let outcome = engine.answer_question("closes").await;
        assert!(outcome.error_message().unwrap().contains("not loaded"));
        assert!(llm.prompts().is_empty());
    }

    #[tokio::test]
    async fn test_query_after_failed_load() {
        let llm = FakeLlm::answering("unused");
        let engine = RagEngine::new(&library_config(), llm.clone()).unwrap();

        let result = engine.load_document(&StaticExtractor(None), Path::new("uploaded_pdfs"));
        assert!(matches!(result, Err(Error::DocumentLoad(_))));
        assert!(matches!(engine.readiness(), Readiness::Failed(_)));

        let outcome = engine.answer_question("closes").await;
        let message = outcome.error_message().unwrap();
        assert!(message.contains("Please check server logs"));
        assert!(llm.prompts().is_empty());
    }

    #[tokio::test]
    async fn test_service_failure_is_error_payload() {
        let engine = loaded_engine(FakeLlm::failing("deadline exceeded"));

        let outcome = engine.answer_question("closes").await;
        assert!(!outcome.is_answer());
        assert_eq!(
            outcome.error_message(),
            Some("Generation service error: deadline exceeded")
        );
    }

    #[tokio::test]
    async fn test_prompt_too_large() {
        let llm = FakeLlm::answering("unused");
        let mut config = library_config();
        config.llm.max_prompt_chars = Some(40);
        let engine = RagEngine::new(&config, llm.clone()).unwrap();
        engine
            .load_document(&StaticExtractor(Some(LIBRARY)), Path::new("library.txt"))
            .unwrap();

        let outcome = engine.answer_question("closes").await;
        assert!(outcome.error_message().unwrap().starts_with("Prompt too large"));
        assert!(llm.prompts().is_empty());
    }

    #[tokio::test]
    async fn test_no_limit_sends_everything() {
        let llm = FakeLlm::answering("ok");
        let mut config = library_config();
        config.llm.max_prompt_chars = None;
        let engine = RagEngine::new(&config, llm.clone()).unwrap();
        engine
            .load_document(&StaticExtractor(Some(LIBRARY)), Path::new("library.txt"))
            .unwrap();

        assert!(engine.answer_question("opens").await.is_answer());
        assert!(llm.prompts()[0].contains("Context:\nThe library opens at nine. The\n\n"));
    }

    #[test]
    fn test_second_load_is_rejected() {
        let engine = loaded_engine(FakeLlm::answering("ok"));
        let again = engine.load_document(&StaticExtractor(Some("other text")), Path::new("b.txt"));
        assert!(matches!(again, Err(Error::Internal(_))));
        assert!(matches!(engine.readiness(), Readiness::Ready(_)));
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let mut config = library_config();
        config.chunking.chunk_overlap = 6;
        let result = RagEngine::new(&config, FakeLlm::answering("ok"));
        assert!(matches!(result, Err(Error::InvalidConfiguration(_))));
    }

    #[test]
    fn test_invalid_template_or_service_settings_are_rejected() {
        let mut config = library_config();
        config.persona.template = "{context} only".to_string();
        let result = RagEngine::new(&config, FakeLlm::answering("ok"));
        assert!(matches!(result, Err(Error::InvalidConfiguration(_))));

        let mut config = library_config();
        config.llm.timeout_secs = 0;
        let result = RagEngine::new(&config, FakeLlm::answering("ok"));
        assert!(matches!(result, Err(Error::InvalidConfiguration(_))));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("library.txt");
        std::fs::write(&path, LIBRARY).unwrap();

        let engine = RagEngine::new(&library_config(), FakeLlm::answering("ok")).unwrap();
        assert_eq!(engine.load_document(&FileExtractor::new(), &path).unwrap(), 2);
        assert!(matches!(engine.readiness(), Readiness::Ready(_)));
    }
}
