//! Document ingestion: normalization and directory scanning

pub mod normalizer;
pub mod scanner;

pub use normalizer::DocumentNormalizer;
pub use scanner::{DirectoryScanner, IngestFailure, IngestReport, RECOGNIZED_EXTENSIONS};
