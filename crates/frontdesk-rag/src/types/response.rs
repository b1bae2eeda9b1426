//! Response types for queries

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::error::{Error, Result};

/// Result of `answer_question`: either an answer or an error payload.
///
/// Serializes as `{"answer": "..."}` or `{"error": "..."}`.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum QueryOutcome {
    /// Generated answer
    Answer {
        /// Trimmed text returned by the generation service
        answer: String,
    },
    /// Query-level failure
    Error {
        /// Human-readable error message
        error: String,
        /// HTTP status used when served over HTTP
        #[serde(skip)]
        status: StatusCode,
    },
}

impl QueryOutcome {
    /// Create a successful outcome
    pub fn answer(answer: impl Into<String>) -> Self {
        Self::Answer {
            answer: answer.into(),
        }
    }

    /// Create an error outcome from a pipeline error
    pub fn from_error(err: &Error) -> Self {
        Self::Error {
            error: err.to_string(),
            status: err.status_code(),
        }
    }

    /// Create an error outcome with an explicit status, for failures that
    /// happen before the pipeline runs
    pub fn error(message: impl Into<String>, status: StatusCode) -> Self {
        Self::Error {
            error: message.into(),
            status,
        }
    }

    /// Whether this outcome carries an answer
    pub fn is_answer(&self) -> bool {
        matches!(self, Self::Answer { .. })
    }

    /// The answer text, if any
    pub fn answer_text(&self) -> Option<&str> {
        match self {
            Self::Answer { answer } => Some(answer),
            Self::Error { .. } => None,
        }
    }

    /// The error message, if any
    pub fn error_message(&self) -> Option<&str> {
        match self {
            Self::Answer { .. } => None,
            Self::Error { error, .. } => Some(error),
        }
    }
}

impl From<Result<String>> for QueryOutcome {
    fn from(result: Result<String>) -> Self {
        match result {
            Ok(answer) => Self::answer(answer),
            Err(err) => Self::from_error(&err),
        }
    }
}

impl IntoResponse for QueryOutcome {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::Answer { .. } => StatusCode::OK,
            Self::Error { status, .. } => *status,
        };
        (status, Json(self)).into_response()
    }
}
