//! Embedding backend trait and implementations.
//!
//! The [`Embedder`] trait abstracts over inference engines so the similarity
//! layer never couples to a specific model runtime or transport. Calls are
//! async and per-text: the similarity engine fans out one request per
//! eligible node and tolerates individual failures.

use async_trait::async_trait;
use codeweb_core::Embedding;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors originating from an embedding backend. Always recovered per-node
/// by the caller; a failed node simply stays stale until the next pass.
#[derive(Debug, Error)]
pub enum EmbedError {
    /// Transport-level failure (network, TLS, timeout).
    #[error("embedding request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend answered but without a usable vector.
    #[error("embedder returned no vector")]
    Empty,

    /// Non-success status or malformed payload from the backend.
    #[error("embedding backend error: {0}")]
    Backend(String),
}

/// External capability mapping text to a numeric vector.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Embed a single text passage.
    async fn embed(&self, text: &str) -> Result<Embedding, EmbedError>;

    /// Dimensionality of the vectors this backend produces.
    fn dimension(&self) -> usize;

    /// Human-readable model identifier.
    fn model_name(&self) -> &str;
}

// ---------------------------------------------------------------------------
// NoOpEmbedder: always available, useful for tests and offline pipelines
// ---------------------------------------------------------------------------

/// Returns zero-vectors. Zero vectors have cosine similarity 0 with
/// everything, so this backend exercises the full pipeline without ever
/// producing a semantic edge.
#[derive(Debug, Default, Clone)]
pub struct NoOpEmbedder {
    dim: usize,
}

impl NoOpEmbedder {
    pub fn new(dim: usize) -> Self {
        Self { dim }
    }
}

#[async_trait]
impl Embedder for NoOpEmbedder {
    async fn embed(&self, _text: &str) -> Result<Embedding, EmbedError> {
        Ok(vec![0.0; self.dim])
    }

    fn dimension(&self) -> usize {
        self.dim
    }

    fn model_name(&self) -> &str {
        "noop"
    }
}

// ---------------------------------------------------------------------------
// HttpEmbedder: OpenAI-compatible /embeddings endpoint
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: [&'a str; 1],
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    embedding: Embedding,
}

/// Talks to any OpenAI-compatible embeddings API (OpenAI, Ollama, vLLM, …).
pub struct HttpEmbedder {
    client: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
    model: String,
    dim: usize,
}

impl HttpEmbedder {
    /// Create a backend for `endpoint` (base URL without `/embeddings`).
    pub fn new(
        endpoint: impl Into<String>,
        api_key: Option<String>,
        model: impl Into<String>,
        dim: usize,
    ) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
            api_key,
            model: model.into(),
            dim,
        }
    }

    /// Configure from `CODEWEB_EMBED_URL`, `CODEWEB_EMBED_KEY`,
    /// `CODEWEB_EMBED_MODEL`, and `CODEWEB_EMBED_DIM`. Returns `None` when
    /// no endpoint is configured.
    pub fn from_env() -> Option<Self> {
        let endpoint = std::env::var("CODEWEB_EMBED_URL").ok()?;
        let api_key = std::env::var("CODEWEB_EMBED_KEY").ok();
        let model = std::env::var("CODEWEB_EMBED_MODEL")
            .unwrap_or_else(|_| "text-embedding-3-small".to_string());
        let dim = std::env::var("CODEWEB_EMBED_DIM")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(1536);

        Some(Self::new(endpoint, api_key, model, dim))
    }
}

#[async_trait]
impl Embedder for HttpEmbedder {
    async fn embed(&self, text: &str) -> Result<Embedding, EmbedError> {
        let url = format!("{}/embeddings", self.endpoint.trim_end_matches('/'));
        let body = EmbeddingRequest {
            model: &self.model,
            input: [text],
        };

        let mut request = self.client.post(&url).json(&body);
        if let Some(key) = &self.api_key {
            request = request.header("Authorization", format!("Bearer {key}"));
        }

        let response = request.send().await?;
        if !response.status().is_success() {
            let status = response.status();
            let detail = response.text().await.unwrap_or_default();
            return Err(EmbedError::Backend(format!("{status}: {detail}")));
        }

        let parsed: EmbeddingResponse = response.json().await?;
        parsed
            .data
            .into_iter()
            .next()
            .map(|d| d.embedding)
            .ok_or(EmbedError::Empty)
    }

    fn dimension(&self) -> usize {
        self.dim
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
