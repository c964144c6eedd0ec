//! Error taxonomy for the search pipeline and reference resolution.
//!
//! Search failures are asymmetric by design: a keyword-stage failure is fatal
//! for the whole request, while semantic-stage failures degrade to
//! keyword-only results when any keyword hits exist. Reference validation
//! failures are not errors at all on the free-text search path; they only
//! surface as client errors on the dedicated lookup endpoint.

use std::time::Duration;
use thiserror::Error;

/// Failures inside the hybrid search pipeline.
#[derive(Error, Debug)]
pub enum SearchError {
    /// The paragraph store could not be reached or rejected the query.
    #[error("paragraph store unavailable: {0}")]
    StoreUnavailable(String),

    /// The completion provider failed to rewrite the query.
    #[error("query rewrite failed: {0}")]
    RewriteFailed(String),

    /// The embedding provider failed to produce a query vector.
    #[error("embedding request failed: {0}")]
    EmbeddingFailed(String),

    /// The semantic stage exceeded its time budget.
    #[error("semantic stage timed out after {0:?}")]
    Timeout(Duration),
}

/// A reference token matched one of the recognized shapes but failed
/// bounds or span validation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvalidReference {
    #[error("paragraph {number} is out of range (valid: 1-{corpus_size})")]
    OutOfRange { number: u32, corpus_size: u32 },

    #[error("range start {start} is greater than end {end}")]
    Reversed { start: u32, end: u32 },

    #[error("range {start}-{end} spans more than {max_span} paragraphs")]
    SpanTooLarge { start: u32, end: u32, max_span: u32 },
}
