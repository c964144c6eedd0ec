use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;

use crate::models::{
    LookupResponse, Paragraph, RangeResponse, SearchRequest, SearchResponse,
};
use crate::resolver::{resolve, Resolution};
use crate::state::AppState;
use crate::store::ParagraphStore;

/// A search box submission is either a paragraph reference or a free-text
/// query; the response shape follows the branch taken.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum SearchReply {
    Lookup(LookupResponse),
    Search(SearchResponse),
}

/// POST /api/search - Reference-first hybrid search:
///   1. If the query parses as a paragraph reference, range-fetch and
///      return it verbatim (no ranking).
///   2. Otherwise run the cascade: keyword search, and if hits are too
///      few, rewrite + expand + embed + vector search, then fuse.
pub async fn search(
    State(state): State<AppState>,
    Json(req): Json<SearchRequest>,
) -> Result<Json<SearchReply>, (StatusCode, String)> {
    let query = req.query.trim().to_string();
    if query.is_empty() {
        return Err((StatusCode::BAD_REQUEST, "Query is required".to_string()));
    }

    // An invalid reference (bad bounds, oversized span) falls through to
    // free-text search rather than erroring; only the dedicated lookup
    // endpoint surfaces validation failures.
    if let Resolution::Reference(spec) = resolve(
        &query,
        state.config.search.corpus_size,
        state.config.search.max_reference_span,
    ) {
        let paragraphs = state
            .store
            .fetch_range(spec.start, spec.end)
            .await
            .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, format!("Lookup failed: {e}")))?;
        return lookup_reply(spec.is_single(), spec.start, spec.end, paragraphs)
            .map(|r| Json(SearchReply::Lookup(r)));
    }

    let outcome = state.search.search(&query).await.map_err(|e| {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Search failed: {e}"),
        )
    })?;

    // Empty results are a valid outcome, not an error
    Ok(Json(SearchReply::Search(SearchResponse {
        results: outcome.results.into_iter().map(Into::into).collect(),
        query,
        search_type: outcome.provenance,
    })))
}

pub(crate) fn lookup_reply(
    single: bool,
    start: u32,
    end: u32,
    paragraphs: Vec<Paragraph>,
) -> Result<LookupResponse, (StatusCode, String)> {
    if paragraphs.is_empty() {
        return Err((
            StatusCode::NOT_FOUND,
            format!("No paragraphs found in range {start}-{end}"),
        ));
    }

    if single {
        match paragraphs.into_iter().next() {
            Some(p) => Ok(LookupResponse::Single(p)),
            None => Err((
                StatusCode::NOT_FOUND,
                format!("Paragraph {start} not found"),
            )),
        }
    } else {
        Ok(LookupResponse::Range(RangeResponse {
            start_paragraph: start,
            end_paragraph: end,
            paragraphs,
        }))
    }
}
