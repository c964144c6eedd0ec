use serde::{Deserialize, Serialize};

/// One numbered paragraph of the corpus. Immutable; the pipeline only reads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paragraph {
    #[serde(rename = "paragraphNumber")]
    pub number: u32,
    #[serde(rename = "content")]
    pub text: String,
}

/// A scored hit from either retrieval path. Score semantics differ by
/// source (keyword relevance vs. cosine similarity vs. boosted keyword);
/// the orchestrator labels the final set with a [`Provenance`].
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResult {
    pub number: u32,
    pub text: String,
    pub score: f32,
}

/// Which retrieval path(s) produced a result set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provenance {
    Keyword,
    Hybrid,
    Semantic,
}

/// An inclusive paragraph range parsed from a reference token.
/// Invariant: `1 <= start <= end <= N` and the span is at most the
/// configured maximum (10 in the reference system).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReferenceSpec {
    pub start: u32,
    pub end: u32,
}

impl ReferenceSpec {
    pub fn is_single(&self) -> bool {
        self.start == self.end
    }
}

/// Search request
#[derive(Debug, Clone, Deserialize)]
pub struct SearchRequest {
    pub query: String,
}

/// One search result on the wire. `id` duplicates the paragraph number;
/// clients of the reference system key on both fields.
#[derive(Debug, Clone, Serialize)]
pub struct SearchResultBody {
    pub id: u32,
    #[serde(rename = "paragraphNumber")]
    pub paragraph_number: u32,
    pub content: String,
    pub similarity: f32,
}

impl From<SearchResult> for SearchResultBody {
    fn from(r: SearchResult) -> Self {
        Self {
            id: r.number,
            paragraph_number: r.number,
            content: r.text,
            similarity: r.score,
        }
    }
}

/// Search response
#[derive(Debug, Clone, Serialize)]
pub struct SearchResponse {
    pub results: Vec<SearchResultBody>,
    pub query: String,
    #[serde(rename = "searchType")]
    pub search_type: Provenance,
}

/// Response for a range lookup like "283-284".
#[derive(Debug, Clone, Serialize)]
pub struct RangeResponse {
    #[serde(rename = "startParagraph")]
    pub start_paragraph: u32,
    #[serde(rename = "endParagraph")]
    pub end_paragraph: u32,
    pub paragraphs: Vec<Paragraph>,
}

/// A paragraph lookup returns a bare object for a single paragraph and a
/// range envelope for multi-paragraph references.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum LookupResponse {
    Single(Paragraph),
    Range(RangeResponse),
}
