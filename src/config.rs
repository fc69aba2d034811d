//! Configuration for the pipeline

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::embedding::batch::DEFAULT_BATCH_SIZE;
use crate::error::{Error, Result};
use crate::retrieval::ContextStrategy;

/// Main pipeline configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RagConfig {
    /// Embedding service configuration
    #[serde(default)]
    pub embeddings: EmbeddingConfig,
    /// Generation (LLM) configuration
    #[serde(default)]
    pub llm: LlmConfig,
    /// Ingestion configuration
    #[serde(default)]
    pub ingestion: IngestionConfig,
    /// Context assembly configuration
    #[serde(default)]
    pub context: ContextConfig,
}

impl RagConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        toml::from_str(&raw)
            .map_err(|e| Error::Config(format!("Failed to parse {}: {}", path.display(), e)))
    }
}

/// Embedding service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    /// Embedding server base URL
    pub base_url: String,
    /// Embedding model name
    pub model: String,
    /// Embedding dimensions (1024 for bge-large)
    pub dimensions: usize,
    /// Batch size for embedding generation
    pub batch_size: usize,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Cache directory for model artifacts
    pub cache_dir: PathBuf,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:11434".to_string(),
            model: "bge-large".to_string(),
            dimensions: 1024,
            batch_size: DEFAULT_BATCH_SIZE,
            timeout_secs: 120,
            cache_dir: dirs::cache_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("fastrag")
                .join("models"),
        }
    }
}

/// Generation service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// OpenAI-compatible API base URL
    pub api_base: String,
    /// Generation model name
    pub model: String,
    /// Temperature for generation
    pub temperature: f32,
    /// Maximum output tokens
    pub max_tokens: u32,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Environment variable holding the API credential
    pub api_key_env: String,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_base: "https://api.groq.com/openai/v1".to_string(),
            model: "moonshotai/kimi-k2-instruct".to_string(),
            temperature: 0.5,
            max_tokens: 100_000,
            timeout_secs: 120,
            api_key_env: "GROQ_API_KEY".to_string(),
        }
    }
}

/// Ingestion configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestionConfig {
    /// Default documents directory scanned at startup
    pub docs_dir: PathBuf,
    /// Collection name backing the session's index
    pub collection: String,
}

impl Default for IngestionConfig {
    fn default() -> Self {
        Self {
            docs_dir: PathBuf::from("./docs"),
            collection: "fastest-rag".to_string(),
        }
    }
}

/// Context assembly configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ContextConfig {
    /// How the context string is built at query time
    pub strategy: ContextStrategy,
    /// Character budget for the assembled context
    pub max_chars: usize,
    /// Number of nearest documents retrieved by the search strategy
    pub top_k: usize,
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self {
            strategy: ContextStrategy::ConcatenateAll,
            max_chars: 32_000,
            top_k: 5,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_source_configuration() {
        let config = RagConfig::default();
        assert_eq!(config.embeddings.batch_size, 512);
        assert_eq!(config.embeddings.dimensions, 1024);
        assert_eq!(config.llm.temperature, 0.5);
        assert_eq!(config.llm.api_key_env, "GROQ_API_KEY");
        assert_eq!(config.ingestion.collection, "fastest-rag");
        assert_eq!(config.context.strategy, ContextStrategy::ConcatenateAll);
    }

    #[test]
    fn partial_toml_falls_back_to_defaults() {
        let parsed: RagConfig = toml::from_str(
            r#"
            [context]
            strategy = "similarity_search"
            max_chars = 1000
            top_k = 3

            [embeddings]
            dimensions = 8
            "#,
        )
        .unwrap();

        assert_eq!(parsed.context.strategy, ContextStrategy::SimilaritySearch);
        assert_eq!(parsed.context.max_chars, 1000);
        assert_eq!(parsed.embeddings.dimensions, 8);
        // Untouched sections keep their defaults
        assert_eq!(parsed.llm.temperature, 0.5);
        assert_eq!(parsed.ingestion.collection, "fastest-rag");
    }
}
