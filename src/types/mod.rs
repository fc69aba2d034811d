//! Core data types

pub mod document;
pub mod query;

pub use document::Document;
pub use query::SearchHit;
