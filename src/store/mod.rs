//! Paragraph corpus storage: keyword index, vector store, and range fetch.
//!
//! [`ParagraphStore`] is the seam the orchestrator and resolver consume.
//! [`IndexStore`] is the in-process implementation backed by a tantivy
//! full-text index, an in-memory cosine-similarity vector store, and the
//! corpus itself held as a dense `Vec<Paragraph>`.

pub mod keyword;
pub mod vector;

use anyhow::{Context, Result};
use async_trait::async_trait;
use std::path::Path;

use crate::error::SearchError;
use crate::models::{Paragraph, SearchResult};

pub use keyword::KeywordIndex;
pub use vector::VectorStore;

/// Read-only access to the paragraph corpus.
///
/// Implementations must return keyword and vector hits ordered descending
/// by score, and range fetches ordered ascending by paragraph number. An
/// empty result list is never an error.
#[async_trait]
pub trait ParagraphStore: Send + Sync {
    /// Full-text relevance search; at most `limit` hits.
    async fn search_keyword(
        &self,
        query: &str,
        limit: usize,
    ) -> Result<Vec<SearchResult>, SearchError>;

    /// Nearest-neighbor search; only hits with similarity >= `threshold`.
    async fn search_vector(
        &self,
        embedding: &[f32],
        threshold: f32,
        limit: usize,
    ) -> Result<Vec<SearchResult>, SearchError>;

    /// All paragraphs with `start <= number <= end`, ascending. Empty if
    /// none exist in the range; the caller maps that to not-found.
    async fn fetch_range(&self, start: u32, end: u32) -> Result<Vec<Paragraph>, SearchError>;
}

/// The in-process store: corpus + tantivy index + vector store.
pub struct IndexStore {
    corpus: Vec<Paragraph>,
    keyword: KeywordIndex,
    vectors: VectorStore,
}

impl IndexStore {
    /// Load the corpus from `corpus_path` and open (or build) the indexes.
    pub fn open_or_create(
        corpus_path: &Path,
        index_dir: &Path,
        vector_dir: &Path,
    ) -> Result<Self> {
        let data = std::fs::read_to_string(corpus_path).with_context(|| {
            format!("Failed to read corpus file {}", corpus_path.display())
        })?;
        let corpus: Vec<Paragraph> =
            serde_json::from_str(&data).context("Failed to parse corpus file")?;
        Self::from_corpus(corpus, index_dir, vector_dir)
    }

    /// Build a store from an already-loaded corpus. The corpus must have
    /// dense paragraph numbers 1..N with no gaps; range fetches rely on it.
    pub fn from_corpus(
        mut corpus: Vec<Paragraph>,
        index_dir: &Path,
        vector_dir: &Path,
    ) -> Result<Self> {
        anyhow::ensure!(!corpus.is_empty(), "corpus is empty");
        corpus.sort_by_key(|p| p.number);
        for (i, p) in corpus.iter().enumerate() {
            anyhow::ensure!(
                p.number == i as u32 + 1,
                "corpus paragraph numbers are not dense: expected {}, found {}",
                i + 1,
                p.number
            );
        }

        let fresh = !index_dir.join("meta.json").exists();
        let keyword = KeywordIndex::open_or_create(index_dir)?;
        if fresh {
            tracing::info!("Indexing {} paragraphs into keyword index", corpus.len());
            keyword.index_paragraphs(&corpus)?;
        }

        let vectors = VectorStore::open_or_create(vector_dir)?;

        Ok(Self {
            corpus,
            keyword,
            vectors,
        })
    }

    pub fn corpus_len(&self) -> u32 {
        self.corpus.len() as u32
    }

    /// Dimensionality of the stored embeddings, if any exist.
    pub fn embedding_dim(&self) -> Option<usize> {
        self.vectors.dim()
    }

    pub fn vector_count(&self) -> usize {
        self.vectors.entry_count()
    }

    /// Attach precomputed embeddings, pairing each with its paragraph text.
    /// Embedding generation itself happens offline; this only loads results.
    pub fn add_embeddings(&self, embeddings: Vec<(u32, Vec<f32>)>) -> Result<()> {
        let entries = embeddings
            .into_iter()
            .map(|(number, embedding)| {
                let text = number
                    .checked_sub(1)
                    .and_then(|i| self.corpus.get(i as usize))
                    .map(|p| p.text.clone())
                    .with_context(|| format!("no paragraph {number} in corpus"))?;
                Ok((number, text, embedding))
            })
            .collect::<Result<Vec<_>>>()?;
        self.vectors.insert_batch(entries)
    }
}

#[async_trait]
impl ParagraphStore for IndexStore {
    async fn search_keyword(
        &self,
        query: &str,
        limit: usize,
    ) -> Result<Vec<SearchResult>, SearchError> {
        // tantivy searches are blocking; keep them off the async runtime.
        let keyword = self.keyword.clone();
        let query = query.to_string();
        tokio::task::spawn_blocking(move || keyword.search(&query, limit))
            .await
            .map_err(|e| SearchError::StoreUnavailable(format!("search task failed: {e}")))?
            .map_err(|e| SearchError::StoreUnavailable(format!("{e:#}")))
    }

    async fn search_vector(
        &self,
        embedding: &[f32],
        threshold: f32,
        limit: usize,
    ) -> Result<Vec<SearchResult>, SearchError> {
        Ok(self.vectors.search(embedding, threshold, limit))
    }

    async fn fetch_range(&self, start: u32, end: u32) -> Result<Vec<Paragraph>, SearchError> {
        if start == 0 || start > end {
            return Ok(Vec::new());
        }
        Ok(self
            .corpus
            .iter()
            .filter(|p| p.number >= start && p.number <= end)
            .cloned()
            .collect())
    }
}
