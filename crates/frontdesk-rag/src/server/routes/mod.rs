//! API routes for the question-answering server

pub mod query;

use axum::{extract::State, routing::get, Json, Router};

use crate::retrieval::Readiness;
use crate::server::state::AppState;

/// Build the `/api` routes
pub fn api_routes() -> Router<AppState> {
    Router::new().route("/info", get(info))
}

/// API info endpoint
async fn info(State(state): State<AppState>) -> Json<serde_json::Value> {
    let engine = state.engine();
    let (status, chunks) = match state.readiness() {
        Readiness::Loading => ("loading", None),
        Readiness::Ready(store) => ("ready", Some(store.len())),
        Readiness::Failed(_) => ("failed", None),
    };

    Json(serde_json::json!({
        "name": "frontdesk-rag",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "Receptionist-style answers grounded in a single document",
        "endpoints": {
            "POST /rag": "Ask a question: {\"query\": \"...\"}",
            "GET /health": "Liveness check",
            "GET /ready": "Document loaded and ready to answer",
            "GET /api/info": "This document"
        },
        "document": {
            "status": status,
            "chunks": chunks
        },
        "retrieval": {
            "scorer": engine.retriever().scorer_name(),
            "top_k": engine.retriever().top_k()
        },
        "llm": {
            "provider": engine.llm().name(),
            "model": engine.llm().model()
        }
    }))
}
