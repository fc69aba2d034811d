//! Embedding generation and binary quantization

pub mod batch;
pub mod provider;
pub mod quantize;

pub use batch::BatchEmbedder;
pub use provider::{EmbeddingProvider, HttpEmbedder};
pub use quantize::{quantize, BinaryCode};
