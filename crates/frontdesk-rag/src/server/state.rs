//! Application state for the question-answering server

use std::sync::Arc;

use crate::engine::RagEngine;
use crate::retrieval::Readiness;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    /// Answering pipeline; its store is filled once by the loader
    engine: Arc<RagEngine>,
}

impl AppState {
    /// Create new application state around a shared engine
    pub fn new(engine: Arc<RagEngine>) -> Self {
        Self {
            inner: Arc::new(AppStateInner { engine }),
        }
    }

    /// Get the engine
    pub fn engine(&self) -> &RagEngine {
        &self.inner.engine
    }

    /// Current store state
    pub fn readiness(&self) -> Readiness<'_> {
        self.inner.engine.readiness()
    }
}
