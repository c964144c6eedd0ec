//! Axum HTTP handlers.

pub mod paragraphs;
pub mod search;

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub corpus_size: u32,
    pub max_reference_span: u32,
    pub vector_entries: usize,
    pub embedding_dim: usize,
}

/// GET /api/health - corpus and index status.
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        corpus_size: state.config.search.corpus_size,
        max_reference_span: state.config.search.max_reference_span,
        vector_entries: state.store.vector_count(),
        embedding_dim: state.config.llm.embedding_dim,
    })
}
