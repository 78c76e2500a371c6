//! Structured query language and evaluation.
//!
//! # Responsibility
//! - Define typed query expressions over a document's field set.
//! - Evaluate expressions against indexed records.
//! - Accept the JSON query form used by schemaless callers.

pub mod expr;
pub mod json;
pub mod matcher;

pub use expr::{FieldOperator, Query, QueryError, QueryResult};
pub use json::parse_query;
pub use matcher::matches;
