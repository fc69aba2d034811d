//! Query result types

use serde::{Deserialize, Serialize};

/// One retrieval match: the stored document text and its Hamming distance
/// from the query code. Smaller distance means a closer match.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchHit {
    /// Text of the matched index entry
    pub text: String,
    /// Hamming distance to the query code
    pub distance: u32,
}
