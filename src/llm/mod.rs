//! Provider clients for the semantic fallback path.
//!
//! Both clients are stateless wrappers over an HTTP API (Ollama or any
//! OpenAI-compatible endpoint). Retries, if wanted, belong to the HTTP
//! layer; the pipeline calls each provider exactly once per request.

pub mod embeddings;
pub mod rewrite;

pub use embeddings::{EmbeddingClient, HttpEmbeddingClient};
pub use rewrite::{CompletionClient, HttpCompletionClient, QueryRewriter};
