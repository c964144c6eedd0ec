use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Where the corpus file, keyword index, and vector store live
    pub data_dir: PathBuf,
    /// Server bind address
    pub bind_addr: String,
    /// LLM provider configuration
    pub llm: LlmConfig,
    /// Search pipeline tunables
    pub search: SearchConfig,
}

/// Tunables for the hybrid search cascade and reference resolution.
///
/// These are deliberate constants, not derived values: the sufficiency
/// threshold and keyword boost encode the design decision that exact
/// lexical matches are preferred over approximate semantic ones.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Number of paragraphs in the corpus (N). Paragraph ids are dense in [1, N].
    pub corpus_size: u32,
    /// Per-stage fetch limit for keyword and vector search
    pub keyword_limit: usize,
    /// Keyword hit count at which the semantic fallback is skipped entirely
    pub keyword_sufficiency: usize,
    /// Minimum cosine similarity for a vector hit to count
    pub vector_threshold: f32,
    /// Maximum results returned to the caller
    pub result_cap: usize,
    /// Score boost added to keyword hits before fusing with vector hits
    pub keyword_boost: f32,
    /// Maximum paragraphs a single reference range may span
    pub max_reference_span: u32,
    /// Budget for the semantic stage (rewrite + embed + vector search)
    pub semantic_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// "ollama" or "openai"
    pub provider: String,
    /// Base URL for the LLM API
    pub base_url: String,
    /// Model name for query rewriting
    pub chat_model: String,
    /// Model name for embeddings
    pub embedding_model: String,
    /// API key (only needed for cloud providers)
    pub api_key: Option<String>,
    /// Embedding vector dimension; must match the vector store's index
    pub embedding_dim: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./data"),
            bind_addr: "127.0.0.1:9000".to_string(),
            llm: LlmConfig::default(),
            search: SearchConfig::default(),
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            corpus_size: 2865,
            keyword_limit: 10,
            keyword_sufficiency: 5,
            vector_threshold: 0.3,
            result_cap: 10,
            keyword_boost: 0.5,
            max_reference_span: 10,
            semantic_timeout_secs: 30,
        }
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: "openai".to_string(),
            base_url: "https://api.openai.com".to_string(),
            chat_model: "gpt-4o-mini".to_string(),
            embedding_model: "text-embedding-3-small".to_string(),
            api_key: None,
            embedding_dim: 1536,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(dir) = std::env::var("CATECHISM_DATA_DIR") {
            config.data_dir = PathBuf::from(dir);
        }
        if let Ok(addr) = std::env::var("CATECHISM_BIND_ADDR") {
            config.bind_addr = addr;
        }
        if let Ok(provider) = std::env::var("LLM_PROVIDER") {
            config.llm.provider = provider;
        }
        if let Ok(url) = std::env::var("LLM_BASE_URL") {
            config.llm.base_url = url;
        }
        if let Ok(model) = std::env::var("LLM_CHAT_MODEL") {
            config.llm.chat_model = model;
        }
        if let Ok(model) = std::env::var("LLM_EMBEDDING_MODEL") {
            config.llm.embedding_model = model;
        }
        if let Ok(key) = std::env::var("LLM_API_KEY") {
            config.llm.api_key = Some(key);
        }
        if let Ok(dim) = std::env::var("LLM_EMBEDDING_DIM") {
            if let Ok(d) = dim.parse() {
                config.llm.embedding_dim = d;
            }
        }
        if let Ok(val) = std::env::var("CATECHISM_CORPUS_SIZE") {
            if let Ok(v) = val.parse() {
                config.search.corpus_size = v;
            }
        }
        if let Ok(val) = std::env::var("CATECHISM_KEYWORD_SUFFICIENCY") {
            if let Ok(v) = val.parse() {
                config.search.keyword_sufficiency = v;
            }
        }
        if let Ok(val) = std::env::var("CATECHISM_VECTOR_THRESHOLD") {
            if let Ok(v) = val.parse() {
                config.search.vector_threshold = v;
            }
        }
        if let Ok(val) = std::env::var("CATECHISM_RESULT_CAP") {
            if let Ok(v) = val.parse() {
                config.search.result_cap = v;
            }
        }
        if let Ok(val) = std::env::var("CATECHISM_SEMANTIC_TIMEOUT_SECS") {
            if let Ok(v) = val.parse() {
                config.search.semantic_timeout_secs = v;
            }
        }

        config
    }

    pub fn corpus_path(&self) -> PathBuf {
        self.data_dir.join("paragraphs.json")
    }

    pub fn index_dir(&self) -> PathBuf {
        self.data_dir.join("index")
    }

    pub fn vector_dir(&self) -> PathBuf {
        self.data_dir.join("vectors")
    }
}
