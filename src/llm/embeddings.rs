use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::LlmConfig;
use crate::error::SearchError;

/// Maximum characters to send to the embedding API. Expanded queries are
/// short, but a pathological input should not blow the provider's context
/// window. Split on a UTF-8 char boundary.
const MAX_EMBED_CHARS: usize = 3_000;

fn truncate_for_embedding(text: &str) -> &str {
    if text.len() <= MAX_EMBED_CHARS {
        return text;
    }
    let mut end = MAX_EMBED_CHARS;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[..end]
}

/// Turns text into a fixed-length embedding vector. Deterministic for a
/// given input and model; the vector's dimensionality must match the
/// store's index (validated at startup, not per request).
#[async_trait]
pub trait EmbeddingClient: Send + Sync {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, SearchError>;
}

/// Embedding client backed by Ollama or an OpenAI-compatible API.
pub struct HttpEmbeddingClient {
    client: reqwest::Client,
    config: LlmConfig,
}

impl HttpEmbeddingClient {
    pub fn new(client: reqwest::Client, config: LlmConfig) -> Self {
        Self { client, config }
    }

    async fn embed_inner(&self, text: &str) -> Result<Vec<f32>> {
        let text = truncate_for_embedding(text);
        match self.config.provider.as_str() {
            "ollama" => self.embed_ollama(text).await,
            "openai" => self.embed_openai(text).await,
            other => anyhow::bail!("Unknown LLM provider: {other}"),
        }
    }

    async fn embed_ollama(&self, text: &str) -> Result<Vec<f32>> {
        let url = format!("{}/api/embed", self.config.base_url);

        let req = OllamaEmbedRequest {
            model: self.config.embedding_model.clone(),
            input: vec![text.to_string()],
            truncate: true,
        };

        let resp = self
            .client
            .post(&url)
            .json(&req)
            .send()
            .await
            .context("Failed to call Ollama embed API")?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            anyhow::bail!("Ollama embed API returned {status}: {body}");
        }

        let body: OllamaEmbedResponse = resp
            .json()
            .await
            .context("Failed to parse Ollama embed response")?;

        body.embeddings
            .into_iter()
            .next()
            .context("No embedding returned")
    }

    async fn embed_openai(&self, text: &str) -> Result<Vec<f32>> {
        let url = format!("{}/v1/embeddings", self.config.base_url);
        let api_key = self.config.api_key.as_deref().unwrap_or_default();

        let req = OpenAiEmbedRequest {
            model: self.config.embedding_model.clone(),
            input: vec![text.to_string()],
        };

        let resp = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {api_key}"))
            .json(&req)
            .send()
            .await
            .context("Failed to call OpenAI embed API")?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            anyhow::bail!("OpenAI embed API returned {status}: {body}");
        }

        let body: OpenAiEmbedResponse = resp
            .json()
            .await
            .context("Failed to parse OpenAI embed response")?;

        body.data
            .into_iter()
            .next()
            .map(|d| d.embedding)
            .context("No embedding returned")
    }
}

#[async_trait]
impl EmbeddingClient for HttpEmbeddingClient {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, SearchError> {
        self.embed_inner(text)
            .await
            .map_err(|e| SearchError::EmbeddingFailed(format!("{e:#}")))
    }
}

// ─── Ollama ──────────────────────────────────────────────

#[derive(Serialize)]
struct OllamaEmbedRequest {
    model: String,
    input: Vec<String>,
    /// Ask Ollama to silently truncate inputs that exceed the model's
    /// context length instead of returning a 400 error.
    truncate: bool,
}

#[derive(Deserialize)]
struct OllamaEmbedResponse {
    embeddings: Vec<Vec<f32>>,
}

// ─── OpenAI-compatible ───────────────────────────────────

#[derive(Serialize)]
struct OpenAiEmbedRequest {
    model: String,
    input: Vec<String>,
}

#[derive(Deserialize)]
struct OpenAiEmbedResponse {
    data: Vec<OpenAiEmbedData>,
}

#[derive(Deserialize)]
struct OpenAiEmbedData {
    embedding: Vec<f32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_text_unchanged() {
        assert_eq!(truncate_for_embedding("what is prayer"), "what is prayer");
    }

    #[test]
    fn test_truncation_respects_char_boundary() {
        let text = "é".repeat(MAX_EMBED_CHARS); // 2 bytes each
        let truncated = truncate_for_embedding(&text);
        assert!(truncated.len() <= MAX_EMBED_CHARS);
        assert!(truncated.is_char_boundary(truncated.len()));
    }
}
