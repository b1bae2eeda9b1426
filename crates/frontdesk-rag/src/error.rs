//! Error types for the question-answering pipeline

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Result type alias for pipeline operations
pub type Result<T> = std::result::Result<T, Error>;

/// Pipeline errors
///
/// `DocumentLoad` and `InvalidConfiguration` are startup errors and abort the
/// process. The remaining variants are per-query and end up as an error
/// payload at the query boundary.
#[derive(Debug, Error)]
pub enum Error {
    /// Source document missing, unreadable or without text
    #[error("Failed to load document: {0}")]
    DocumentLoad(String),

    /// Malformed chunking, retrieval, template or service settings
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Chunk store not initialized, or initialization failed
    #[error("Document data not loaded: {0}")]
    NotReady(String),

    /// Generation service call failed or timed out
    #[error("Generation service error: {0}")]
    Service(String),

    /// Assembled prompt exceeds the generation service input limit
    #[error("Prompt too large: {length} characters (limit {limit})")]
    PromptTooLarge { length: usize, limit: usize },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create a document load error
    pub fn document_load(message: impl Into<String>) -> Self {
        Self::DocumentLoad(message.into())
    }

    /// Create an invalid configuration error
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfiguration(message.into())
    }

    /// Create a generation service error
    pub fn service(message: impl Into<String>) -> Self {
        Self::Service(message.into())
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Short machine-readable label, used in logs
    pub fn kind(&self) -> &'static str {
        match self {
            Error::DocumentLoad(_) => "document_load_error",
            Error::InvalidConfiguration(_) => "invalid_configuration",
            Error::NotReady(_) => "not_ready",
            Error::Service(_) => "service_error",
            Error::PromptTooLarge { .. } => "prompt_too_large",
            Error::Io(_) => "io_error",
            Error::Internal(_) => "internal_error",
        }
    }

    /// HTTP status reported for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::NotReady(_) => StatusCode::SERVICE_UNAVAILABLE,
            Error::Service(_) => StatusCode::BAD_GATEWAY,
            Error::PromptTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            Error::InvalidConfiguration(_) => StatusCode::BAD_REQUEST,
            Error::DocumentLoad(_) | Error::Io(_) | Error::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let body = Json(json!({ "error": self.to_string() }));
        (self.status_code(), body).into_response()
    }
}
