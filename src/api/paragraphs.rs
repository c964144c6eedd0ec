use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use crate::api::search::lookup_reply;
use crate::models::LookupResponse;
use crate::resolver::{resolve, Resolution};
use crate::state::AppState;
use crate::store::ParagraphStore;

/// GET /api/paragraphs/{reference} - Dedicated paragraph lookup.
///
/// Unlike the search path, a token that is not a valid reference is a
/// client error here, with validation failures spelled out.
pub async fn lookup(
    State(state): State<AppState>,
    Path(reference): Path<String>,
) -> Result<Json<LookupResponse>, (StatusCode, String)> {
    let spec = match resolve(
        &reference,
        state.config.search.corpus_size,
        state.config.search.max_reference_span,
    ) {
        Resolution::Reference(spec) => spec,
        Resolution::Invalid(err) => {
            return Err((StatusCode::BAD_REQUEST, err.to_string()));
        }
        Resolution::NotAReference => {
            return Err((
                StatusCode::BAD_REQUEST,
                format!("'{reference}' is not a paragraph reference"),
            ));
        }
    };

    let paragraphs = state
        .store
        .fetch_range(spec.start, spec.end)
        .await
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, format!("Lookup failed: {e}")))?;

    lookup_reply(spec.is_single(), spec.start, spec.end, paragraphs).map(Json)
}
