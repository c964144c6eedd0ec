use anyhow::{Context, Result};
use std::path::Path;
use tantivy::collector::TopDocs;
use tantivy::query::QueryParser;
use tantivy::schema::*;
use tantivy::{doc, Index, IndexWriter, ReloadPolicy, TantivyDocument};

use crate::models::{Paragraph, SearchResult};

/// Full-text keyword index over the paragraph corpus, built on tantivy.
#[derive(Clone)]
pub struct KeywordIndex {
    index: Index,
    f_number: Field,
    f_text: Field,
}

impl KeywordIndex {
    /// Create or open the index at the given directory.
    pub fn open_or_create(index_dir: &Path) -> Result<Self> {
        std::fs::create_dir_all(index_dir)?;

        let mut schema_builder = Schema::builder();
        let f_number =
            schema_builder.add_u64_field("number", NumericOptions::default() | STORED);
        let f_text = schema_builder.add_text_field("text", TEXT | STORED);
        let schema = schema_builder.build();

        let index = if index_dir.join("meta.json").exists() {
            Index::open_in_dir(index_dir).context("Failed to open existing tantivy index")?
        } else {
            Index::create_in_dir(index_dir, schema).context("Failed to create tantivy index")?
        };

        Ok(Self {
            index,
            f_number,
            f_text,
        })
    }

    /// Index the full corpus. Called once when the index directory is fresh.
    pub fn index_paragraphs(&self, paragraphs: &[Paragraph]) -> Result<()> {
        let mut writer: IndexWriter = self
            .index
            .writer(50_000_000)
            .context("Failed to create index writer")?;

        for p in paragraphs {
            writer.add_document(doc!(
                self.f_number => p.number as u64,
                self.f_text => p.text.clone(),
            ))?;
        }

        writer.commit().context("Failed to commit index")?;
        Ok(())
    }

    /// Search the index and return scored hits, relevance descending.
    pub fn search(&self, query_str: &str, limit: usize) -> Result<Vec<SearchResult>> {
        let reader = self
            .index
            .reader_builder()
            .reload_policy(ReloadPolicy::OnCommitWithDelay)
            .try_into()
            .context("Failed to create reader")?;

        let searcher = reader.searcher();

        let query_parser = QueryParser::for_index(&self.index, vec![self.f_text]);
        // Lenient parse: user queries are natural language, not tantivy
        // syntax, and stray quotes or colons must not fail the request.
        let (query, _errors) = query_parser.parse_query_lenient(query_str);

        let top_docs = searcher
            .search(&query, &TopDocs::with_limit(limit))
            .context("Keyword search failed")?;

        let mut hits = Vec::new();

        for (score, doc_address) in top_docs {
            let doc: TantivyDocument = searcher
                .doc(doc_address)
                .context("Failed to retrieve document")?;

            let number = doc
                .get_first(self.f_number)
                .and_then(|v| v.as_u64())
                .unwrap_or(0) as u32;

            let text = doc
                .get_first(self.f_text)
                .and_then(|v| v.as_str())
                .unwrap_or_default()
                .to_string();

            hits.push(SearchResult {
                number,
                text,
                score,
            });
        }

        Ok(hits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_paragraphs() -> Vec<Paragraph> {
        vec![
            Paragraph {
                number: 1,
                text: "Prayer is the raising of one's mind and heart to God.".to_string(),
            },
            Paragraph {
                number: 2,
                text: "The Eucharist is the source and summit of the Christian life."
                    .to_string(),
            },
            Paragraph {
                number: 3,
                text: "Humility is the foundation of prayer.".to_string(),
            },
        ]
    }

    #[test]
    fn test_index_and_search() {
        let dir = tempfile::tempdir().unwrap();
        let index = KeywordIndex::open_or_create(dir.path()).unwrap();
        index.index_paragraphs(&sample_paragraphs()).unwrap();

        let hits = index.search("prayer", 10).unwrap();
        assert_eq!(hits.len(), 2);
        let numbers: Vec<u32> = hits.iter().map(|h| h.number).collect();
        assert!(numbers.contains(&1));
        assert!(numbers.contains(&3));
        // Descending by relevance
        assert!(hits[0].score >= hits[1].score);
    }

    #[test]
    fn test_no_match_returns_empty() {
        let dir = tempfile::tempdir().unwrap();
        let index = KeywordIndex::open_or_create(dir.path()).unwrap();
        index.index_paragraphs(&sample_paragraphs()).unwrap();

        let hits = index.search("zzrandomgibberish123", 10).unwrap();
        assert!(hits.is_empty());
    }

    #[test]
    fn test_limit_respected() {
        let dir = tempfile::tempdir().unwrap();
        let index = KeywordIndex::open_or_create(dir.path()).unwrap();
        let corpus: Vec<Paragraph> = (1..=20)
            .map(|n| Paragraph {
                number: n,
                text: format!("paragraph {n} about grace"),
            })
            .collect();
        index.index_paragraphs(&corpus).unwrap();

        let hits = index.search("grace", 5).unwrap();
        assert_eq!(hits.len(), 5);
    }

    #[test]
    fn test_query_with_stray_syntax_does_not_error() {
        let dir = tempfile::tempdir().unwrap();
        let index = KeywordIndex::open_or_create(dir.path()).unwrap();
        index.index_paragraphs(&sample_paragraphs()).unwrap();

        // Unmatched quote would be a parse error in strict mode
        assert!(index.search("what is \"prayer", 10).is_ok());
    }
}
