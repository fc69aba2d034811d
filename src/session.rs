//! Explicit session: loaded documents, index lifecycle, and the query path
//!
//! The session replaces ambient UI state with an object that is passed
//! through the pipeline. One query is processed end to end before the next
//! begins; the session is not shared across threads.

use std::path::Path;
use std::sync::Arc;

use crate::config::RagConfig;
use crate::embedding::{BatchEmbedder, EmbeddingProvider, HttpEmbedder};
use crate::error::{Error, Result};
use crate::generation::GenerationGateway;
use crate::index::VectorIndex;
use crate::ingestion::{DirectoryScanner, DocumentNormalizer, IngestFailure};
use crate::retrieval::{ContextAssembler, ContextStrategy};
use crate::types::Document;

/// Result of a bulk load: how many documents were added and which files
/// were skipped.
#[derive(Debug, Default)]
pub struct LoadOutcome {
    /// Number of documents added to the session
    pub loaded: usize,
    /// Files that could not be ingested
    pub failures: Vec<IngestFailure>,
}

/// A document question-answering session.
pub struct Session {
    config: RagConfig,
    documents: Vec<Document>,
    scanner: DirectoryScanner,
    embedder: BatchEmbedder,
    index: VectorIndex,
    assembler: ContextAssembler,
    gateway: GenerationGateway,
    indexed: bool,
}

impl Session {
    /// Build a session from configuration.
    ///
    /// Reads the generation credential from the environment and fails fast
    /// when it is absent, before any document is accepted.
    pub fn from_config(config: RagConfig) -> Result<Self> {
        let provider: Arc<dyn EmbeddingProvider> = Arc::new(HttpEmbedder::new(&config.embeddings)?);
        let gateway = GenerationGateway::from_env(&config.llm)?;
        Self::with_providers(config, provider, gateway)
    }

    /// Build a session with an explicit embedding provider and gateway
    pub fn with_providers(
        config: RagConfig,
        provider: Arc<dyn EmbeddingProvider>,
        gateway: GenerationGateway,
    ) -> Result<Self> {
        let embedder = BatchEmbedder::new(provider, config.embeddings.batch_size);
        let assembler = ContextAssembler::new(
            config.context.strategy,
            config.context.max_chars,
            config.context.top_k,
        );

        Ok(Self {
            scanner: DirectoryScanner::new(DocumentNormalizer::new()),
            embedder,
            index: VectorIndex::new(),
            assembler,
            gateway,
            documents: Vec::new(),
            indexed: false,
            config,
        })
    }

    /// Documents loaded so far, in load order
    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    /// True when no documents are loaded
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Normalize raw bytes and add the document to the session
    pub fn load_bytes(&mut self, bytes: &[u8], filename: &str) -> Result<()> {
        let doc = self.scanner.normalizer().normalize(bytes, filename)?;
        tracing::info!(source = %doc.source_name, chars = doc.text.len(), "loaded document");
        self.documents.push(doc);
        self.indexed = false;
        Ok(())
    }

    /// Read, normalize and add a single file
    pub fn load_file(&mut self, path: &Path) -> Result<()> {
        let doc = self.scanner.load_file(path)?;
        tracing::info!(source = %doc.source_name, chars = doc.text.len(), "loaded document");
        self.documents.push(doc);
        self.indexed = false;
        Ok(())
    }

    /// Recursively load a directory. Per-file failures are collected in the
    /// outcome instead of aborting the batch.
    pub fn load_dir(&mut self, dir: &Path) -> Result<LoadOutcome> {
        let report = self.scanner.scan(dir)?;
        let loaded = report.documents.len();
        if loaded > 0 {
            self.documents.extend(report.documents);
            self.indexed = false;
        }
        Ok(LoadOutcome {
            loaded,
            failures: report.failures,
        })
    }

    /// Drop all loaded documents and the backing collection
    pub fn clear(&mut self) {
        self.documents.clear();
        // The collection only exists after index_documents has run
        let _ = self.index.drop_collection(&self.config.ingestion.collection);
        self.indexed = false;
        tracing::info!("session cleared");
    }

    /// Embed and index every loaded document, rebuilding the collection
    /// from scratch. Returns the number of entries indexed.
    pub async fn index_documents(&mut self) -> Result<usize> {
        if self.documents.is_empty() {
            return Err(Error::NoDocuments);
        }

        let collection = self.config.ingestion.collection.clone();
        let _ = self.index.drop_collection(&collection);
        self.index
            .create_collection(&collection, self.embedder.code_bits())?;

        let texts: Vec<String> = self.documents.iter().map(|d| d.text.clone()).collect();
        let codes = self.embedder.embed_batch(&texts).await?;
        let entries: Vec<_> = texts.into_iter().zip(codes).collect();
        self.index.insert(&collection, entries)?;

        self.indexed = true;
        tracing::info!(collection = %collection, count = self.documents.len(), "documents indexed");
        Ok(self.documents.len())
    }

    /// Answer a question about the loaded documents.
    ///
    /// Fails with [`Error::NoDocuments`] before the gateway is ever invoked
    /// when nothing is loaded. The similarity-search strategy indexes lazily
    /// on the first query after a load.
    pub async fn query(&mut self, question: &str) -> Result<String> {
        if self.documents.is_empty() {
            return Err(Error::NoDocuments);
        }

        if self.assembler.strategy() == ContextStrategy::SimilaritySearch && !self.indexed {
            self.index_documents().await?;
        }

        let context = self
            .assembler
            .assemble(
                question,
                &self.documents,
                &self.embedder,
                &self.index,
                &self.config.ingestion.collection,
            )
            .await?;

        self.gateway.answer(&context, question).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ContextConfig, LlmConfig};
    use async_trait::async_trait;

    struct MockProvider;

    #[async_trait]
    impl EmbeddingProvider for MockProvider {
        async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
            Ok(texts
                .iter()
                .map(|t| {
                    let byte = t.bytes().next().unwrap_or(0);
                    (0..8)
                        .map(|bit| if byte & (0x80 >> bit) != 0 { 1.0 } else { -1.0 })
                        .collect()
                })
                .collect())
        }

        fn dimensions(&self) -> usize {
            8
        }

        fn name(&self) -> &str {
            "mock"
        }
    }

    fn test_session(strategy: ContextStrategy) -> Session {
        let config = RagConfig {
            context: ContextConfig {
                strategy,
                ..ContextConfig::default()
            },
            // Point the gateway at a closed port so an accidental call fails
            // loudly instead of reaching a real service.
            llm: LlmConfig {
                api_base: "http://127.0.0.1:1".to_string(),
                timeout_secs: 1,
                ..LlmConfig::default()
            },
            ..RagConfig::default()
        };
        let gateway = GenerationGateway::new(&config.llm, "sk-test".to_string()).unwrap();
        Session::with_providers(config, Arc::new(MockProvider), gateway).unwrap()
    }

    #[tokio::test]
    async fn query_without_documents_never_reaches_the_gateway() {
        let mut session = test_session(ContextStrategy::ConcatenateAll);
        let err = session.query("anything?").await.unwrap_err();
        // NoDocuments, not a connection error: the gateway was never called
        assert!(matches!(err, Error::NoDocuments));
    }

    #[tokio::test]
    async fn load_and_clear_round_trip() {
        let mut session = test_session(ContextStrategy::ConcatenateAll);
        session.load_bytes(b"alpha text", "a.txt").unwrap();
        session.load_bytes(b"beta text", "b.txt").unwrap();
        assert_eq!(session.documents().len(), 2);

        session.clear();
        assert!(session.is_empty());
        assert!(matches!(
            session.query("q").await.unwrap_err(),
            Error::NoDocuments
        ));
    }

    #[tokio::test]
    async fn index_documents_builds_the_collection() {
        let mut session = test_session(ContextStrategy::SimilaritySearch);
        session.load_bytes(b"alpha", "a.txt").unwrap();
        session.load_bytes(b"beta", "b.txt").unwrap();

        let indexed = session.index_documents().await.unwrap();
        assert_eq!(indexed, 2);
        assert_eq!(session.index.len("fastest-rag").unwrap(), 2);
    }

    #[tokio::test]
    async fn reindexing_rebuilds_instead_of_duplicating() {
        let mut session = test_session(ContextStrategy::SimilaritySearch);
        session.load_bytes(b"alpha", "a.txt").unwrap();

        session.index_documents().await.unwrap();
        session.load_bytes(b"beta", "b.txt").unwrap();
        session.index_documents().await.unwrap();

        assert_eq!(session.index.len("fastest-rag").unwrap(), 2);
    }

    #[tokio::test]
    async fn indexing_an_empty_session_is_rejected() {
        let mut session = test_session(ContextStrategy::SimilaritySearch);
        assert!(matches!(
            session.index_documents().await.unwrap_err(),
            Error::NoDocuments
        ));
    }

    #[tokio::test]
    async fn unsupported_upload_is_rejected_without_poisoning_the_session() {
        let mut session = test_session(ContextStrategy::ConcatenateAll);
        session.load_bytes(b"good", "good.txt").unwrap();
        let err = session.load_bytes(b"bad", "bad.xyz").unwrap_err();
        assert!(matches!(err, Error::UnsupportedFormat(_)));
        assert_eq!(session.documents().len(), 1);
    }
}
