use std::sync::Arc;

use crate::config::Config;
use crate::llm::{
    CompletionClient, EmbeddingClient, HttpCompletionClient, HttpEmbeddingClient, QueryRewriter,
};
use crate::search::{HybridSearch, SynonymExpander};
use crate::store::{IndexStore, ParagraphStore};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub store: Arc<IndexStore>,
    pub search: Arc<HybridSearch>,
}

impl AppState {
    pub fn new(config: Config) -> anyhow::Result<Self> {
        std::fs::create_dir_all(&config.data_dir)?;

        let store = Arc::new(IndexStore::open_or_create(
            &config.corpus_path(),
            &config.index_dir(),
            &config.vector_dir(),
        )?);

        // Dimensionality mismatch is a configuration error; fail at startup
        // rather than on the first semantic query.
        if let Some(dim) = store.embedding_dim() {
            anyhow::ensure!(
                dim == config.llm.embedding_dim,
                "vector store dimensionality {dim} does not match configured embedding_dim {}",
                config.llm.embedding_dim
            );
        }

        if store.corpus_len() != config.search.corpus_size {
            tracing::warn!(
                loaded = store.corpus_len(),
                configured = config.search.corpus_size,
                "corpus size differs from configuration; references validate against the configured size"
            );
        }

        let http_client = reqwest::Client::builder()
            .connect_timeout(std::time::Duration::from_secs(10))
            .timeout(std::time::Duration::from_secs(60))
            .build()?;

        let embeddings: Arc<dyn EmbeddingClient> = Arc::new(HttpEmbeddingClient::new(
            http_client.clone(),
            config.llm.clone(),
        ));
        let completions: Arc<dyn CompletionClient> = Arc::new(HttpCompletionClient::new(
            http_client,
            config.llm.clone(),
        ));

        let search = Arc::new(HybridSearch::new(
            store.clone() as Arc<dyn ParagraphStore>,
            QueryRewriter::new(completions),
            embeddings,
            SynonymExpander::with_default_table(),
            config.search.clone(),
        ));

        Ok(Self {
            config,
            store,
            search,
        })
    }
}
