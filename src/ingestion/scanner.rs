//! Recursive directory ingestion with per-file failure isolation

use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::error::{Error, Result};
use crate::types::Document;

use super::normalizer::DocumentNormalizer;

/// Extensions the ingestion surface accepts
pub const RECOGNIZED_EXTENSIONS: [&str; 3] = ["pdf", "txt", "md"];

/// Outcome of ingesting a batch of files.
///
/// One bad file never aborts the rest: failures are collected per file and
/// reported alongside the documents that did load.
#[derive(Debug, Default)]
pub struct IngestReport {
    /// Successfully normalized documents, in scan order
    pub documents: Vec<Document>,
    /// Files that could not be ingested, with the reason
    pub failures: Vec<IngestFailure>,
}

/// A single file that failed to ingest
#[derive(Debug)]
pub struct IngestFailure {
    /// Path of the failing file
    pub source: PathBuf,
    /// Why it failed
    pub error: Error,
}

/// Walks a directory tree and normalizes every file it finds.
pub struct DirectoryScanner {
    normalizer: DocumentNormalizer,
}

impl DirectoryScanner {
    /// Create a scanner around a normalizer
    pub fn new(normalizer: DocumentNormalizer) -> Self {
        Self { normalizer }
    }

    /// The normalizer backing this scanner
    pub fn normalizer(&self) -> &DocumentNormalizer {
        &self.normalizer
    }

    /// Read and normalize a single file
    pub fn load_file(&self, path: &Path) -> Result<Document> {
        let bytes = std::fs::read(path)?;
        let filename = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("unnamed")
            .to_string();
        self.normalizer.normalize(&bytes, &filename)
    }

    /// Recursively scan `dir` and normalize every file.
    ///
    /// Files outside the recognized extension set are reported as
    /// unsupported rather than silently skipped. Entries are visited in
    /// file-name order so load order is deterministic.
    pub fn scan(&self, dir: &Path) -> Result<IngestReport> {
        let mut report = IngestReport::default();

        for entry in WalkDir::new(dir).sort_by_file_name() {
            let entry = entry.map_err(|e| Error::Io(e.into()))?;
            if !entry.file_type().is_file() {
                continue;
            }
            let path = entry.path();

            // Report unsupported extensions without reading the file
            let extension = path
                .extension()
                .and_then(|e| e.to_str())
                .map(|e| e.to_lowercase());
            let recognized = extension
                .as_deref()
                .is_some_and(|e| RECOGNIZED_EXTENSIONS.contains(&e) || e == "docx");
            if !recognized {
                let error = Error::UnsupportedFormat(
                    extension.unwrap_or_else(|| format!("{} has no extension", path.display())),
                );
                tracing::warn!(source = %path.display(), %error, "could not ingest file");
                report.failures.push(IngestFailure {
                    source: path.to_path_buf(),
                    error,
                });
                continue;
            }

            match self.load_file(path) {
                Ok(doc) => {
                    tracing::info!(source = %path.display(), chars = doc.text.len(), "ingested file");
                    report.documents.push(doc);
                }
                Err(error) => {
                    tracing::warn!(source = %path.display(), %error, "could not ingest file");
                    report.failures.push(IngestFailure {
                        source: path.to_path_buf(),
                        error,
                    });
                }
            }
        }

        Ok(report)
    }
}
