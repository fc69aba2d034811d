//! Exact binary vector index with Hamming-distance search

use parking_lot::RwLock;
use std::collections::HashMap;

use crate::embedding::BinaryCode;
use crate::error::{Error, Result};
use crate::types::SearchHit;

/// A stored entry: auto-assigned id, source text, and binary code.
///
/// Owned exclusively by the index; never mutated, removed only when the
/// whole collection is dropped.
#[derive(Debug, Clone)]
pub struct IndexEntry {
    /// Monotonic identifier assigned on insert
    pub auto_id: u64,
    /// Source document text
    pub text: String,
    /// Bit-packed embedding code
    pub code: BinaryCode,
}

struct Collection {
    code_bits: usize,
    next_id: u64,
    entries: Vec<IndexEntry>,
}

/// In-memory index of named collections over fixed-length binary codes.
///
/// Search is exact brute force: correctness over the full corpus is the
/// requirement here, and the expected corpus is documents, not web-scale.
///
/// Inserts serialize behind a write lock; a search started after an insert
/// completes sees every entry that insert committed.
#[derive(Default)]
pub struct VectorIndex {
    collections: RwLock<HashMap<String, Collection>>,
}

impl VectorIndex {
    /// Create an empty index
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a collection over codes of `code_bits` bits.
    ///
    /// `code_bits` must be a non-zero multiple of 8 (codes are byte-packed).
    pub fn create_collection(&self, name: &str, code_bits: usize) -> Result<()> {
        if code_bits == 0 || code_bits % 8 != 0 {
            return Err(Error::Config(format!(
                "code_bits must be a non-zero multiple of 8, got {}",
                code_bits
            )));
        }

        let mut collections = self.collections.write();
        if collections.contains_key(name) {
            return Err(Error::CollectionExists(name.to_string()));
        }

        collections.insert(
            name.to_string(),
            Collection {
                code_bits,
                next_id: 0,
                entries: Vec::new(),
            },
        );
        tracing::debug!(collection = name, code_bits, "created collection");
        Ok(())
    }

    /// Drop a collection and all of its entries
    pub fn drop_collection(&self, name: &str) -> Result<()> {
        self.collections
            .write()
            .remove(name)
            .map(|_| ())
            .ok_or_else(|| Error::CollectionNotFound(name.to_string()))
    }

    /// True if the named collection has been created
    pub fn has_collection(&self, name: &str) -> bool {
        self.collections.read().contains_key(name)
    }

    /// Number of entries in a collection
    pub fn len(&self, name: &str) -> Result<usize> {
        let collections = self.collections.read();
        let collection = collections
            .get(name)
            .ok_or_else(|| Error::CollectionNotFound(name.to_string()))?;
        Ok(collection.entries.len())
    }

    /// True if the collection holds no entries
    pub fn is_empty(&self, name: &str) -> Result<bool> {
        Ok(self.len(name)? == 0)
    }

    /// Append entries, assigning each a fresh auto-increment id.
    ///
    /// Atomic per call: every code is validated against the collection's
    /// declared bit length before any entry is committed.
    pub fn insert(&self, name: &str, entries: Vec<(String, BinaryCode)>) -> Result<()> {
        let mut collections = self.collections.write();
        let collection = collections
            .get_mut(name)
            .ok_or_else(|| Error::CollectionNotFound(name.to_string()))?;

        for (_, code) in &entries {
            if code.bit_len() != collection.code_bits {
                return Err(Error::DimensionMismatch {
                    expected: collection.code_bits,
                    actual: code.bit_len(),
                });
            }
        }

        let inserted = entries.len();
        for (text, code) in entries {
            let auto_id = collection.next_id;
            collection.next_id += 1;
            collection.entries.push(IndexEntry {
                auto_id,
                text,
                code,
            });
        }
        tracing::debug!(collection = name, inserted, total = collection.entries.len(), "inserted entries");
        Ok(())
    }

    /// Exact nearest-neighbor search under Hamming distance.
    ///
    /// Returns up to `top_k` hits sorted ascending by distance; ties break
    /// by insertion order.
    pub fn search(&self, name: &str, query: &BinaryCode, top_k: usize) -> Result<Vec<SearchHit>> {
        let collections = self.collections.read();
        let collection = collections
            .get(name)
            .ok_or_else(|| Error::CollectionNotFound(name.to_string()))?;

        if query.bit_len() != collection.code_bits {
            return Err(Error::DimensionMismatch {
                expected: collection.code_bits,
                actual: query.bit_len(),
            });
        }

        let mut scored: Vec<(u32, &IndexEntry)> = collection
            .entries
            .iter()
            .map(|entry| (query.hamming_distance(&entry.code), entry))
            .collect();
        scored.sort_by_key(|(distance, entry)| (*distance, entry.auto_id));
        scored.truncate(top_k);

        Ok(scored
            .into_iter()
            .map(|(distance, entry)| SearchHit {
                text: entry.text.clone(),
                distance,
            })
            .collect())
    }
}
