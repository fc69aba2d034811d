//! Batched embedding with binary quantization

use std::sync::Arc;

use crate::error::{Error, Result};

use super::provider::EmbeddingProvider;
use super::quantize::{quantize, BinaryCode};

/// Default number of texts sent to the provider per request
pub const DEFAULT_BATCH_SIZE: usize = 512;

/// Embeds texts in contiguous chunks and quantizes every vector to a
/// bit-packed binary code.
pub struct BatchEmbedder {
    provider: Arc<dyn EmbeddingProvider>,
    batch_size: usize,
}

impl BatchEmbedder {
    /// Create a batch embedder. A `batch_size` of zero is treated as one.
    pub fn new(provider: Arc<dyn EmbeddingProvider>, batch_size: usize) -> Self {
        Self {
            provider,
            batch_size: batch_size.max(1),
        }
    }

    /// Embedding dimensions of the underlying provider
    pub fn dimensions(&self) -> usize {
        self.provider.dimensions()
    }

    /// Bit length of the codes this embedder produces
    pub fn code_bits(&self) -> usize {
        self.provider.dimensions().div_ceil(8) * 8
    }

    /// Embed and quantize a sequence of texts.
    ///
    /// Order- and count-preserving: `output[i]` is the code for `texts[i]`.
    /// All-or-nothing: any chunk failure fails the whole call, and the error
    /// names the failing text range so callers can retry with smaller batches.
    pub async fn embed_batch(&self, texts: &[String]) -> Result<Vec<BinaryCode>> {
        let dims = self.provider.dimensions();
        let mut codes = Vec::with_capacity(texts.len());

        for (chunk_index, chunk) in texts.chunks(self.batch_size).enumerate() {
            let start = chunk_index * self.batch_size;
            tracing::debug!(
                provider = self.provider.name(),
                start,
                len = chunk.len(),
                "embedding chunk"
            );

            let vectors = self.provider.embed_batch(chunk).await.map_err(|e| {
                Error::Embedding(format!(
                    "batch failed on texts {}..{}: {}",
                    start,
                    start + chunk.len(),
                    e
                ))
            })?;

            if vectors.len() != chunk.len() {
                return Err(Error::Embedding(format!(
                    "provider returned {} vectors for {} texts",
                    vectors.len(),
                    chunk.len()
                )));
            }

            for vector in &vectors {
                if vector.len() != dims {
                    return Err(Error::DimensionMismatch {
                        expected: dims,
                        actual: vector.len(),
                    });
                }
                codes.push(quantize(vector));
            }
        }

        Ok(codes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    /// Deterministic provider: the sign pattern is derived from the text bytes.
    struct MockProvider {
        dims: usize,
    }

    fn mock_vector(text: &str, dims: usize) -> Vec<f32> {
        (0..dims)
            .map(|i| {
                let byte = text
                    .as_bytes()
                    .get(i % text.len().max(1))
                    .copied()
                    .unwrap_or(0);
                byte as f32 - 96.0
            })
            .collect()
    }

    #[async_trait]
    impl EmbeddingProvider for MockProvider {
        async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
            Ok(texts.iter().map(|t| mock_vector(t, self.dims)).collect())
        }

        fn dimensions(&self) -> usize {
            self.dims
        }

        fn name(&self) -> &str {
            "mock"
        }
    }

    /// Provider that always fails, for batch-fatal behavior.
    struct FailingProvider;

    #[async_trait]
    impl EmbeddingProvider for FailingProvider {
        async fn embed_batch(&self, _texts: &[String]) -> Result<Vec<Vec<f32>>> {
            Err(Error::embedding("service down"))
        }

        fn dimensions(&self) -> usize {
            16
        }

        fn name(&self) -> &str {
            "failing"
        }
    }

    /// Provider returning vectors of the wrong length.
    struct ShortProvider;

    #[async_trait]
    impl EmbeddingProvider for ShortProvider {
        async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
            Ok(texts.iter().map(|_| vec![1.0; 4]).collect())
        }

        fn dimensions(&self) -> usize {
            16
        }

        fn name(&self) -> &str {
            "short"
        }
    }

    fn texts(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("document number {}", i)).collect()
    }

    #[tokio::test]
    async fn preserves_order_and_count() {
        let embedder = BatchEmbedder::new(Arc::new(MockProvider { dims: 24 }), 2);
        let input = texts(5);
        let codes = embedder.embed_batch(&input).await.unwrap();

        assert_eq!(codes.len(), input.len());
        for (text, code) in input.iter().zip(&codes) {
            assert_eq!(*code, quantize(&mock_vector(text, 24)));
        }
    }

    #[tokio::test]
    async fn batch_size_does_not_change_results() {
        let input = texts(7);

        let one_at_a_time = BatchEmbedder::new(Arc::new(MockProvider { dims: 32 }), 1)
            .embed_batch(&input)
            .await
            .unwrap();
        let single_chunk = BatchEmbedder::new(Arc::new(MockProvider { dims: 32 }), 512)
            .embed_batch(&input)
            .await
            .unwrap();

        assert_eq!(one_at_a_time, single_chunk);
    }

    #[tokio::test]
    async fn empty_input_yields_empty_output() {
        let embedder = BatchEmbedder::new(Arc::new(MockProvider { dims: 8 }), 512);
        let codes = embedder.embed_batch(&[]).await.unwrap();
        assert!(codes.is_empty());
    }

    #[tokio::test]
    async fn chunk_failure_fails_the_whole_batch() {
        let embedder = BatchEmbedder::new(Arc::new(FailingProvider), 2);
        let err = embedder.embed_batch(&texts(5)).await.unwrap_err();
        assert!(matches!(err, Error::Embedding(_)));
        assert!(err.to_string().contains("0..2"));
    }

    #[tokio::test]
    async fn wrong_vector_length_is_a_dimension_mismatch() {
        let embedder = BatchEmbedder::new(Arc::new(ShortProvider), 512);
        let err = embedder.embed_batch(&texts(1)).await.unwrap_err();
        assert!(matches!(
            err,
            Error::DimensionMismatch {
                expected: 16,
                actual: 4
            }
        ));
    }

    #[test]
    fn code_bits_rounds_up_to_whole_bytes() {
        let embedder = BatchEmbedder::new(Arc::new(MockProvider { dims: 10 }), 1);
        assert_eq!(embedder.code_bits(), 16);
        let embedder = BatchEmbedder::new(Arc::new(MockProvider { dims: 1024 }), 1);
        assert_eq!(embedder.code_bits(), 1024);
    }
}
