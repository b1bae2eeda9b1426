//! HTTP server for the question-answering pipeline

pub mod routes;
pub mod state;

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::config::ServerConfig;
use crate::engine::RagEngine;
use crate::error::{Error, Result};
use crate::retrieval::Readiness;
use state::AppState;

/// Question-answering HTTP server
pub struct RagServer {
    config: ServerConfig,
    state: AppState,
}

impl RagServer {
    /// Create a server around a shared engine
    pub fn new(config: ServerConfig, engine: Arc<RagEngine>) -> Self {
        Self {
            config,
            state: AppState::new(engine),
        }
    }

    /// Build the router with all routes
    pub fn router(&self) -> Router {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);

        Router::new()
            .route("/health", get(health_check))
            .route("/ready", get(readiness))
            .route("/rag", post(routes::query::answer))
            .nest("/api", routes::api_routes())
            .with_state(self.state.clone())
            .layer(TraceLayer::new_for_http())
            .layer(cors)
    }

    /// Bind and serve until the process stops
    pub async fn start(self) -> Result<()> {
        let addr: SocketAddr = self
            .address()
            .parse()
            .map_err(|e| Error::invalid_config(format!("Invalid address {}: {}", self.address(), e)))?;

        let router = self.router();

        tracing::info!("Starting server on http://{}", addr);
        let listener = tokio::net::TcpListener::bind(addr).await?;
        axum::serve(listener, router).await?;

        Ok(())
    }

    /// Get the server address
    pub fn address(&self) -> String {
        format!("{}:{}", self.config.host, self.config.port)
    }
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}

/// Readiness check endpoint
async fn readiness(State(state): State<AppState>) -> (StatusCode, Json<serde_json::Value>) {
    match state.readiness() {
        Readiness::Ready(store) => (
            StatusCode::OK,
            Json(serde_json::json!({ "status": "ready", "chunks": store.len() })),
        ),
        Readiness::Loading => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(serde_json::json!({ "status": "loading" })),
        ),
        Readiness::Failed(message) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(serde_json::json!({ "status": "failed", "error": message })),
        ),
    }
}
