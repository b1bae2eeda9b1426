//! Query request types

use serde::{Deserialize, Serialize};

/// Body of `POST /rag`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryRequest {
    /// The user's question
    pub query: String,
}
