//! Normalized document type

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

/// A document that has been normalized to plain UTF-8 text.
///
/// Immutable once created; removed only when the owning session is cleared.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// Unique document ID
    pub id: Uuid,
    /// Original filename as provided by the caller
    pub source_name: String,
    /// Normalized text content
    pub text: String,
    /// Content hash for deduplication
    pub content_hash: String,
    /// Ingestion timestamp
    pub ingested_at: DateTime<Utc>,
}

impl Document {
    /// Create a new document from normalized text
    pub fn new(source_name: impl Into<String>, text: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            source_name: source_name.into(),
            content_hash: hash_content(&text),
            text,
            ingested_at: Utc::now(),
        }
    }
}

/// Hash content for deduplication
fn hash_content(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_hash_is_stable() {
        let a = Document::new("a.txt", "same text".to_string());
        let b = Document::new("b.txt", "same text".to_string());
        assert_eq!(a.content_hash, b.content_hash);
        assert_ne!(a.id, b.id);
    }
}
