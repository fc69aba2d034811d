//! Context assembly strategies for query answering

use serde::{Deserialize, Serialize};

use crate::embedding::BatchEmbedder;
use crate::error::Result;
use crate::index::VectorIndex;
use crate::types::Document;

/// How the context string is built for a query.
///
/// Both strategies produce a single string handed unmodified to the
/// generation gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContextStrategy {
    /// Concatenate every loaded document's text in load order
    ConcatenateAll,
    /// Embed the query and retrieve the nearest documents from the index
    SimilaritySearch,
}

/// Assembles a bounded context string from loaded documents or search hits.
pub struct ContextAssembler {
    strategy: ContextStrategy,
    max_chars: usize,
    top_k: usize,
}

impl ContextAssembler {
    /// Create an assembler with a character budget
    pub fn new(strategy: ContextStrategy, max_chars: usize, top_k: usize) -> Self {
        Self {
            strategy,
            max_chars,
            top_k,
        }
    }

    /// The configured strategy
    pub fn strategy(&self) -> ContextStrategy {
        self.strategy
    }

    /// Build the context string for `query`.
    ///
    /// The concatenation path ignores the query and joins every loaded
    /// document; the search path embeds the query with the same model that
    /// indexed the documents and joins the hits in ascending-distance order.
    pub async fn assemble(
        &self,
        query: &str,
        documents: &[Document],
        embedder: &BatchEmbedder,
        index: &VectorIndex,
        collection: &str,
    ) -> Result<String> {
        let joined = match self.strategy {
            ContextStrategy::ConcatenateAll => documents
                .iter()
                .map(|d| d.text.as_str())
                .collect::<Vec<_>>()
                .join("\n"),
            ContextStrategy::SimilaritySearch => {
                let codes = embedder.embed_batch(&[query.to_string()]).await?;
                let hits = index.search(collection, &codes[0], self.top_k)?;
                tracing::debug!(hits = hits.len(), top_k = self.top_k, "retrieved context");
                hits.iter()
                    .map(|h| h.text.as_str())
                    .collect::<Vec<_>>()
                    .join("\n")
            }
        };

        Ok(truncate_chars(joined, self.max_chars))
    }
}

/// Truncate to at most `max_chars` characters, on a char boundary.
fn truncate_chars(mut text: String, max_chars: usize) -> String {
    if let Some((idx, _)) = text.char_indices().nth(max_chars) {
        text.truncate(idx);
        tracing::debug!(max_chars, "context truncated to budget");
    }
    text
}
