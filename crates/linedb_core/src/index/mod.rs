//! Full-text indexing entry points.
//!
//! # Responsibility
//! - Derive per-record token sets consumed by `$text` predicates.
//! - Keep tokenization rules in one place for indexing and querying.

pub mod fulltext;

pub use fulltext::{build_index, tokenize, IndexError, IndexResult, TextIndex};
