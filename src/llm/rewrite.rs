use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::config::LlmConfig;
use crate::error::SearchError;

/// One-shot text completion. The rewriter is the only consumer; no retries
/// beyond the caller's policy.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String, SearchError>;
}

/// Reframes a colloquial query into canonical doctrinal terminology before
/// the embedding stage. A failed or empty rewrite is surfaced as
/// [`SearchError::RewriteFailed`]; the orchestrator decides the fallback.
pub struct QueryRewriter {
    completions: Arc<dyn CompletionClient>,
}

impl QueryRewriter {
    pub fn new(completions: Arc<dyn CompletionClient>) -> Self {
        Self { completions }
    }

    pub async fn rewrite(&self, query: &str) -> Result<String, SearchError> {
        let prompt = format!(
            "You rephrase questions about Catholic teaching using the canonical \
             vocabulary of the Catechism of the Catholic Church. Restate the \
             following query in doctrinal terminology while preserving its intent. \
             Respond with ONLY the restated query, no explanation.\n\n\
             Query: \"{query}\""
        );

        let reply = self.completions.complete(&prompt).await?;
        let cleaned = clean_reply(&reply);
        if cleaned.is_empty() {
            return Err(SearchError::RewriteFailed(
                "provider returned an empty rewrite".to_string(),
            ));
        }
        Ok(cleaned)
    }
}

/// Strip markdown fences, surrounding quotes, and whitespace from the
/// provider's reply, keeping the first non-empty line.
fn clean_reply(reply: &str) -> String {
    let mut text = reply.trim();

    if let Some(stripped) = text.strip_prefix("```") {
        // Drop the fence line (may carry a language tag) and the closing fence
        text = stripped;
        if let Some(nl) = text.find('\n') {
            text = &text[nl + 1..];
        }
        text = text.strip_suffix("```").unwrap_or(text);
    }

    let line = text.lines().find(|l| !l.trim().is_empty()).unwrap_or("");
    let line = line.trim();
    let line = line
        .strip_prefix('"')
        .and_then(|l| l.strip_suffix('"'))
        .unwrap_or(line);
    line.trim().to_string()
}

/// Completion client backed by Ollama or an OpenAI-compatible chat API.
pub struct HttpCompletionClient {
    client: reqwest::Client,
    config: LlmConfig,
}

impl HttpCompletionClient {
    pub fn new(client: reqwest::Client, config: LlmConfig) -> Self {
        Self { client, config }
    }

    async fn complete_inner(&self, prompt: &str) -> Result<String> {
        match self.config.provider.as_str() {
            "ollama" => self.call_ollama(prompt).await,
            "openai" => self.call_openai(prompt).await,
            other => anyhow::bail!("Unknown LLM provider: {other}"),
        }
    }

    async fn call_ollama(&self, prompt: &str) -> Result<String> {
        let url = format!("{}/api/chat", self.config.base_url);

        let req = OllamaChatRequest {
            model: self.config.chat_model.clone(),
            messages: vec![Message {
                role: "user".to_string(),
                content: prompt.to_string(),
            }],
            stream: false,
        };

        let resp = self
            .client
            .post(&url)
            .json(&req)
            .send()
            .await
            .context("Failed to call Ollama chat API for query rewriting")?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            anyhow::bail!("Ollama chat API returned {status}: {body}");
        }

        let body: OllamaChatResponse = resp.json().await?;
        Ok(body.message.content)
    }

    async fn call_openai(&self, prompt: &str) -> Result<String> {
        let url = format!("{}/v1/chat/completions", self.config.base_url);
        let api_key = self.config.api_key.as_deref().unwrap_or_default();

        let req = OpenAiChatRequest {
            model: self.config.chat_model.clone(),
            messages: vec![OpenAiMessage {
                role: "user".to_string(),
                content: prompt.to_string(),
            }],
            temperature: 0.3,
        };

        let resp = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {api_key}"))
            .json(&req)
            .send()
            .await
            .context("Failed to call OpenAI chat API for query rewriting")?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            anyhow::bail!("OpenAI chat API returned {status}: {body}");
        }

        let body: OpenAiChatResponse = resp.json().await?;
        Ok(body
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .unwrap_or_default())
    }
}

#[async_trait]
impl CompletionClient for HttpCompletionClient {
    async fn complete(&self, prompt: &str) -> Result<String, SearchError> {
        self.complete_inner(prompt)
            .await
            .map_err(|e| SearchError::RewriteFailed(format!("{e:#}")))
    }
}

// ─── Ollama ──────────────────────────────────────────────

#[derive(Serialize)]
struct OllamaChatRequest {
    model: String,
    messages: Vec<Message>,
    stream: bool,
}

#[derive(Serialize, Deserialize)]
struct Message {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct OllamaChatResponse {
    message: Message,
}

// ─── OpenAI-compatible ───────────────────────────────────

#[derive(Serialize)]
struct OpenAiChatRequest {
    model: String,
    messages: Vec<OpenAiMessage>,
    temperature: f32,
}

#[derive(Serialize)]
struct OpenAiMessage {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct OpenAiChatResponse {
    choices: Vec<OpenAiChoice>,
}

#[derive(Deserialize)]
struct OpenAiChoice {
    message: OpenAiResponseMessage,
}

#[derive(Deserialize)]
struct OpenAiResponseMessage {
    content: String,
}
