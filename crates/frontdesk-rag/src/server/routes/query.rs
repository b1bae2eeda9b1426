//! Question endpoint

use axum::{extract::rejection::JsonRejection, extract::State, Json};

use crate::server::state::AppState;
use crate::types::{QueryOutcome, QueryRequest};

/// POST /rag - Answer a question from the loaded document
///
/// A body that is not `{"query": "<text>"}` gets the same `{"error": ...}`
/// shape as pipeline failures, with the extractor's status.
pub async fn answer(
    State(state): State<AppState>,
    payload: Result<Json<QueryRequest>, JsonRejection>,
) -> QueryOutcome {
    match payload {
        Ok(Json(request)) => state.engine().answer_question(&request.query).await,
        Err(rejection) => {
            tracing::warn!("Rejected query body: {}", rejection.body_text());
            QueryOutcome::error(
                format!("Invalid request: {}", rejection.body_text()),
                rejection.status(),
            )
        }
    }
}
