//! Embedding provider trait and the default HTTP implementation

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::EmbeddingConfig;
use crate::error::{Error, Result};

/// Trait for generating text embeddings.
///
/// Implementations must preserve order and count: `embed_batch` returns one
/// vector per input text, in input order, each of `dimensions()` length.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Generate embeddings for a batch of texts
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;

    /// Embedding dimensions (e.g. 1024 for bge-large)
    fn dimensions(&self) -> usize;

    /// Provider name for logging
    fn name(&self) -> &str;
}

/// HTTP embedder against an Ollama-style embeddings endpoint
pub struct HttpEmbedder {
    client: Client,
    base_url: String,
    model: String,
    dimensions: usize,
}

#[derive(Serialize)]
struct EmbedRequest<'a> {
    model: &'a str,
    prompt: &'a str,
}

#[derive(Deserialize)]
struct EmbedResponse {
    embedding: Vec<f32>,
}

impl HttpEmbedder {
    /// Create a new HTTP embedder from configuration
    pub fn new(config: &EmbeddingConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .pool_max_idle_per_host(5)
            .build()
            .map_err(|e| Error::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            model: config.model.clone(),
            dimensions: config.dimensions,
        })
    }

    async fn embed_one(&self, text: &str) -> Result<Vec<f32>> {
        let url = format!("{}/api/embeddings", self.base_url);
        let request = EmbedRequest {
            model: &self.model,
            prompt: text,
        };

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::Embedding(format!("Embedding request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(Error::Embedding(format!(
                "Embedding failed: HTTP {}",
                response.status()
            )));
        }

        let body: EmbedResponse = response
            .json()
            .await
            .map_err(|e| Error::Embedding(format!("Failed to parse embedding response: {}", e)))?;

        Ok(body.embedding)
    }
}

#[async_trait]
impl EmbeddingProvider for HttpEmbedder {
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        // The endpoint embeds one prompt per request; order is preserved by
        // issuing the calls sequentially.
        let mut embeddings = Vec::with_capacity(texts.len());
        for text in texts {
            embeddings.push(self.embed_one(text).await?);
        }
        Ok(embeddings)
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn name(&self) -> &str {
        "http"
    }
}
