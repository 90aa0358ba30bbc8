//! Assistant search endpoint

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use atrium_guard::{require_principal, AccessError};
use atrium_retrieval::RetrievalError;

use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    pub query: String,
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct SearchResult {
    pub content: String,
    pub score: f32,
    #[serde(rename = "documentId")]
    pub document_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub results: Vec<SearchResult>,
}

/// `POST /assistant/search`
///
/// Results are restricted to content the calling user can read; an
/// unauthorized caller gets an empty list, never someone else's chunks.
#[tracing::instrument(skip(state, request))]
pub async fn search_handler(
    State(state): State<AppState>,
    Json(request): Json<SearchRequest>,
) -> Result<Json<SearchResponse>, AccessError> {
    let user = require_principal(state.sessions.as_ref()).await?;
    if request.query.trim().is_empty() {
        return Err(AccessError::InvalidRequest("query must not be empty".into()));
    }

    let hits = state
        .pipeline
        .search(&user, &request.query, request.limit)
        .await
        .map_err(|err| match err {
            // surfaced with guidance, not a generic 500
            RetrievalError::Provider(provider) => AccessError::InvalidRequest(provider.to_string()),
            other => AccessError::Internal(other.to_string()),
        })?;

    Ok(Json(SearchResponse {
        results: hits
            .into_iter()
            .map(|h| SearchResult { content: h.content, score: h.score, document_id: h.document_id })
            .collect(),
    }))
}
