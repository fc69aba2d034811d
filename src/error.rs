//! Error types for the pipeline

use thiserror::Error;

/// Result type alias for pipeline operations
pub type Result<T> = std::result::Result<T, Error>;

/// Pipeline errors
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error (missing credential, bad config file, ...)
    #[error("Configuration error: {0}")]
    Config(String),

    /// File extension outside the recognized set
    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    /// Text decoding exhausted all fallbacks
    #[error("Failed to decode '{filename}': {message}")]
    Decode { filename: String, message: String },

    /// PDF text extraction failed
    #[error("Failed to extract text from '{filename}': {message}")]
    Extraction { filename: String, message: String },

    /// Embedding or binary code length disagrees with the declared dimension
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// Duplicate collection name
    #[error("Collection already exists: {0}")]
    CollectionExists(String),

    /// Collection has not been created
    #[error("Collection not found: {0}")]
    CollectionNotFound(String),

    /// Embedding service failure (batch-fatal, nothing is committed)
    #[error("Embedding generation failed: {0}")]
    Embedding(String),

    /// Generation service unreachable or rejected the request
    #[error("Generation service unavailable: {0}")]
    Generation(String),

    /// Query attempted with no documents loaded
    #[error("No documents loaded")]
    NoDocuments,

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP request error
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),
}

impl Error {
    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create an extraction error
    pub fn extraction(filename: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Extraction {
            filename: filename.into(),
            message: message.into(),
        }
    }

    /// Create an embedding error
    pub fn embedding(message: impl Into<String>) -> Self {
        Self::Embedding(message.into())
    }

    /// Create a generation error
    pub fn generation(message: impl Into<String>) -> Self {
        Self::Generation(message.into())
    }
}
