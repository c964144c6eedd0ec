use anyhow::{Context, Result};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::models::SearchResult;

/// A stored paragraph embedding
#[derive(Debug, Clone, Serialize, Deserialize)]
struct VectorEntry {
    number: u32,
    text: String,
    embedding: Vec<f32>,
}

/// In-memory vector store with disk persistence and cosine similarity search.
///
/// The corpus is small (a few thousand paragraphs) so a linear scan is
/// faster than maintaining an ANN structure would be worth.
pub struct VectorStore {
    entries: RwLock<Vec<VectorEntry>>,
    persist_path: std::path::PathBuf,
}

impl VectorStore {
    pub fn open_or_create(vector_dir: &Path) -> Result<Self> {
        std::fs::create_dir_all(vector_dir)?;
        let persist_path = vector_dir.join("vectors.json");

        let entries = if persist_path.exists() {
            let data = std::fs::read_to_string(&persist_path)
                .context("Failed to read vector store")?;
            serde_json::from_str(&data).unwrap_or_default()
        } else {
            Vec::new()
        };

        Ok(Self {
            entries: RwLock::new(entries),
            persist_path,
        })
    }

    /// Insert precomputed embeddings as `(number, text, embedding)` triples
    /// and persist the store.
    pub fn insert_batch(&self, batch: Vec<(u32, String, Vec<f32>)>) -> Result<()> {
        let mut entries = self.entries.write();

        for (number, text, embedding) in batch {
            entries.retain(|e| e.number != number);
            entries.push(VectorEntry {
                number,
                text,
                embedding,
            });
        }

        let data = serde_json::to_string(&*entries)?;
        std::fs::write(&self.persist_path, data)?;
        Ok(())
    }

    /// Cosine-similarity search; only hits at or above `threshold`,
    /// descending by similarity, at most `limit`.
    pub fn search(&self, query_embedding: &[f32], threshold: f32, limit: usize) -> Vec<SearchResult> {
        let entries = self.entries.read();

        let mut scored: Vec<(f32, &VectorEntry)> = entries
            .iter()
            .map(|e| (cosine_similarity(query_embedding, &e.embedding), e))
            .filter(|(score, _)| *score >= threshold)
            .collect();

        scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(limit);

        scored
            .into_iter()
            .map(|(score, e)| SearchResult {
                number: e.number,
                text: e.text.clone(),
                score,
            })
            .collect()
    }

    pub fn entry_count(&self) -> usize {
        self.entries.read().len()
    }

    /// Dimensionality of the stored embeddings, if any.
    pub fn dim(&self) -> Option<usize> {
        self.entries.read().first().map(|e| e.embedding.len())
    }
}

fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let mut dot = 0.0f32;
    let mut norm_a = 0.0f32;
    let mut norm_b = 0.0f32;

    for i in 0..a.len() {
        dot += a[i] * b[i];
        norm_a += a[i] * a[i];
        norm_b += b[i] * b[i];
    }

    let denom = norm_a.sqrt() * norm_b.sqrt();
    if denom == 0.0 {
        0.0
    } else {
        dot / denom
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_with(batch: Vec<(u32, &str, Vec<f32>)>) -> (tempfile::TempDir, VectorStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = VectorStore::open_or_create(dir.path()).unwrap();
        store
            .insert_batch(
                batch
                    .into_iter()
                    .map(|(n, t, e)| (n, t.to_string(), e))
                    .collect(),
            )
            .unwrap();
        (dir, store)
    }

    #[test]
    fn test_cosine_identical_vectors() {
        assert!((cosine_similarity(&[0.5, 0.5], &[0.5, 0.5]) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_cosine_orthogonal_vectors() {
        assert!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]).abs() < 1e-6);
    }

    #[test]
    fn test_cosine_dimension_mismatch_is_zero() {
        assert_eq!(cosine_similarity(&[1.0, 0.0], &[1.0]), 0.0);
        assert_eq!(cosine_similarity(&[], &[]), 0.0);
    }

    #[test]
    fn test_threshold_filters_weak_matches() {
        let (_dir, store) = store_with(vec![
            (1, "close", vec![0.9, 0.1, 0.0]),
            (2, "far", vec![0.0, 0.1, 0.9]),
        ]);

        let hits = store.search(&[1.0, 0.0, 0.0], 0.3, 10);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].number, 1);
    }

    #[test]
    fn test_results_descending_and_capped() {
        let (_dir, store) = store_with(vec![
            (1, "a", vec![1.0, 0.0]),
            (2, "b", vec![0.9, 0.1]),
            (3, "c", vec![0.8, 0.2]),
        ]);

        let hits = store.search(&[1.0, 0.0], 0.0, 2);
        assert_eq!(hits.len(), 2);
        assert!(hits[0].score >= hits[1].score);
        assert_eq!(hits[0].number, 1);
    }

    #[test]
    fn test_insert_replaces_existing_number() {
        let (_dir, store) = store_with(vec![(1, "old", vec![1.0, 0.0])]);
        store
            .insert_batch(vec![(1, "new".to_string(), vec![0.0, 1.0])])
            .unwrap();
        assert_eq!(store.entry_count(), 1);

        let hits = store.search(&[0.0, 1.0], 0.5, 10);
        assert_eq!(hits[0].text, "new");
    }

    #[test]
    fn test_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        {
            let store = VectorStore::open_or_create(dir.path()).unwrap();
            store
                .insert_batch(vec![(7, "seven".to_string(), vec![0.1, 0.2])])
                .unwrap();
        }
        let reopened = VectorStore::open_or_create(dir.path()).unwrap();
        assert_eq!(reopened.entry_count(), 1);
        assert_eq!(reopened.dim(), Some(2));
    }
}
