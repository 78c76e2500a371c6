//! Record model shared by the indexer, matcher and store.
//!
//! # Responsibility
//! - Define the scalar value type used by predicates.
//! - Define the document contract callers implement.
//! - Wrap stored documents in an envelope holding derived state.
//!
//! # Invariants
//! - Deletion is represented by soft-delete tombstones, not removal.

pub mod document;
pub mod record;
pub mod scalar;
