//! fastrag: document Q&A over binary-quantized embeddings
//!
//! Ingests PDF, text, and markdown files, embeds them in batches, quantizes
//! each embedding to a bit-packed binary code, and answers questions by
//! retrieving the nearest documents under Hamming distance and prompting a
//! chat-completions service with the assembled context.

pub mod config;
pub mod embedding;
pub mod error;
pub mod generation;
pub mod index;
pub mod ingestion;
pub mod retrieval;
pub mod session;
pub mod types;

pub use config::RagConfig;
pub use embedding::{quantize, BatchEmbedder, BinaryCode, EmbeddingProvider};
pub use error::{Error, Result};
pub use index::VectorIndex;
pub use session::Session;
pub use types::{Document, SearchHit};
