//! The hybrid search cascade.
//!
//! Keyword search runs first; the semantic fallback (rewrite → expand →
//! embed → vector search) only fires when keyword hits are too few. Fusion
//! boosts keyword scores so exact lexical matches outrank approximate
//! semantic ones, dedups by paragraph number (keyword wins), and caps the
//! final list.
//!
//! Failure semantics are asymmetric: keyword-stage failures abort the
//! request, semantic-stage failures degrade to keyword-only output when
//! any keyword hits exist.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use crate::config::SearchConfig;
use crate::error::SearchError;
use crate::llm::{EmbeddingClient, QueryRewriter};
use crate::models::{Provenance, SearchResult};
use crate::search::expand::SynonymExpander;
use crate::store::ParagraphStore;

/// The final result set plus the label naming which path(s) produced it.
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    pub results: Vec<SearchResult>,
    pub provenance: Provenance,
}

/// Stateless per-request orchestrator over injected store and providers.
pub struct HybridSearch {
    store: Arc<dyn ParagraphStore>,
    rewriter: QueryRewriter,
    embeddings: Arc<dyn EmbeddingClient>,
    expander: SynonymExpander,
    config: SearchConfig,
}

impl HybridSearch {
    pub fn new(
        store: Arc<dyn ParagraphStore>,
        rewriter: QueryRewriter,
        embeddings: Arc<dyn EmbeddingClient>,
        expander: SynonymExpander,
        config: SearchConfig,
    ) -> Self {
        Self {
            store,
            rewriter,
            embeddings,
            expander,
            config,
        }
    }

    /// Run the full cascade for one query.
    pub async fn search(&self, query: &str) -> Result<SearchOutcome, SearchError> {
        // Keyword stage. A failure here is fatal: there is no fallback
        // path that avoids the store entirely.
        let keyword_hits = self
            .store
            .search_keyword(query, self.config.keyword_limit)
            .await?;

        if keyword_hits.len() >= self.config.keyword_sufficiency {
            tracing::debug!(
                hits = keyword_hits.len(),
                "keyword hits sufficient, skipping semantic fallback"
            );
            return Ok(SearchOutcome {
                results: keyword_hits,
                provenance: Provenance::Keyword,
            });
        }

        let budget = Duration::from_secs(self.config.semantic_timeout_secs);
        let semantic = match tokio::time::timeout(budget, self.semantic_stage(query)).await {
            Ok(result) => result,
            Err(_) => Err(SearchError::Timeout(budget)),
        };

        let vector_hits = match semantic {
            Ok(hits) => hits,
            Err(err) => {
                if keyword_hits.is_empty() {
                    return Err(err);
                }
                tracing::warn!("semantic stage failed, degrading to keyword-only: {err}");
                return Ok(SearchOutcome {
                    results: keyword_hits,
                    provenance: Provenance::Keyword,
                });
            }
        };

        Ok(fuse(
            keyword_hits,
            vector_hits,
            self.config.keyword_boost,
            self.config.result_cap,
        ))
    }

    /// Rewrite → expand → embed → vector search. Only the embedding is
    /// built from the rewritten+expanded query; keyword search already ran
    /// against the original.
    async fn semantic_stage(&self, query: &str) -> Result<Vec<SearchResult>, SearchError> {
        let rewritten = match self.rewriter.rewrite(query).await {
            Ok(r) => {
                tracing::debug!(rewritten = %r, "query rewritten");
                r
            }
            // Policy: a failed rewrite falls back to the original query
            // rather than aborting the semantic path.
            Err(err) => {
                tracing::warn!("query rewrite failed, using the original query: {err}");
                query.to_string()
            }
        };

        let expanded = self.expander.expand(&rewritten);
        let embedding = self.embeddings.embed(&expanded).await?;

        self.store
            .search_vector(
                &embedding,
                self.config.vector_threshold,
                self.config.keyword_limit,
            )
            .await
    }
}

/// Merge keyword and vector hits into one ranked list.
///
/// Keyword scores get a fixed boost: keyword relevance and cosine
/// similarity live on different scales, and exact lexical matches are
/// preferred when both paths found something. Vector hits for paragraphs
/// already in the keyword set are dropped.
pub fn fuse(
    keyword_hits: Vec<SearchResult>,
    vector_hits: Vec<SearchResult>,
    keyword_boost: f32,
    cap: usize,
) -> SearchOutcome {
    let provenance = if keyword_hits.is_empty() {
        Provenance::Semantic
    } else {
        Provenance::Hybrid
    };

    let mut seen: HashSet<u32> = HashSet::new();
    let mut results: Vec<SearchResult> = keyword_hits
        .into_iter()
        .map(|mut hit| {
            seen.insert(hit.number);
            hit.score += keyword_boost;
            hit
        })
        .collect();

    results.extend(
        vector_hits
            .into_iter()
            .filter(|hit| !seen.contains(&hit.number)),
    );

    results.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
    results.truncate(cap);

    SearchOutcome {
        results,
        provenance,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hit(number: u32, score: f32) -> SearchResult {
        SearchResult {
            number,
            text: format!("paragraph {number}"),
            score,
        }
    }

    #[test]
    fn test_fuse_empty_everything_is_semantic() {
        let out = fuse(vec![], vec![], 0.5, 10);
        assert!(out.results.is_empty());
        assert_eq!(out.provenance, Provenance::Semantic);
    }

    #[test]
    fn test_fuse_vector_only_is_semantic() {
        let out = fuse(vec![], vec![hit(5, 0.8), hit(9, 0.6)], 0.5, 10);
        assert_eq!(out.provenance, Provenance::Semantic);
        assert_eq!(out.results.len(), 2);
        // Vector scores untouched
        assert!((out.results[0].score - 0.8).abs() < 1e-6);
    }

    #[test]
    fn test_fuse_disjoint_sets_is_hybrid_with_boost() {
        let out = fuse(
            vec![hit(1, 1.2), hit(2, 0.9)],
            vec![hit(3, 0.8), hit(4, 0.5)],
            0.5,
            10,
        );
        assert_eq!(out.provenance, Provenance::Hybrid);
        assert_eq!(out.results.len(), 4);
        let boosted: Vec<f32> = out
            .results
            .iter()
            .filter(|r| r.number <= 2)
            .map(|r| r.score)
            .collect();
        assert!(boosted.iter().any(|s| (s - 1.7).abs() < 1e-6));
        assert!(boosted.iter().any(|s| (s - 1.4).abs() < 1e-6));
    }

    #[test]
    fn test_fuse_dedups_by_number_keyword_wins() {
        let out = fuse(vec![hit(7, 0.4)], vec![hit(7, 0.99), hit(8, 0.6)], 0.5, 10);
        let sevens: Vec<&SearchResult> =
            out.results.iter().filter(|r| r.number == 7).collect();
        assert_eq!(sevens.len(), 1);
        // Boosted keyword score retained, not the vector similarity
        assert!((sevens[0].score - 0.9).abs() < 1e-6);
    }

    #[test]
    fn test_fuse_sorted_descending_and_capped() {
        let keyword: Vec<SearchResult> = (1..=6).map(|n| hit(n, n as f32 * 0.1)).collect();
        let vector: Vec<SearchResult> = (7..=14).map(|n| hit(n, 0.95)).collect();
        let out = fuse(keyword, vector, 0.5, 10);
        assert_eq!(out.results.len(), 10);
        for pair in out.results.windows(2) {
            assert!(pair[0].score >= pair[1].score);
        }
    }

    #[test]
    fn test_fuse_keyword_boost_outranks_semantic_in_practice() {
        // Cosine similarity tops out at 1.0; a boosted keyword hit with any
        // meaningful relevance should land above semantic-only matches.
        let out = fuse(vec![hit(1, 0.6)], vec![hit(2, 1.0)], 0.5, 10);
        assert_eq!(out.results[0].number, 1);
    }
}
