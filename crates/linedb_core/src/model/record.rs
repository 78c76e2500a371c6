//! Indexed record envelope.
//!
//! # Responsibility
//! - Own a stored document together with its derived full-text index.
//! - Carry the soft-delete tombstone outside the caller's document shape.
//!
//! # Invariants
//! - `index` is built once on load/insert and never mutated afterwards.
//! - `deleted` only transitions `false -> true`.

use crate::index::TextIndex;

/// Position of a record inside its store.
///
/// Stable for the store lifetime because records are never physically removed.
pub type RecordId = usize;

/// A stored document plus its full-text index and tombstone flag.
#[derive(Debug, Clone)]
pub struct IndexedRecord<D> {
    document: D,
    index: TextIndex,
    deleted: bool,
}

impl<D> IndexedRecord<D> {
    pub(crate) fn new(document: D, index: TextIndex, deleted: bool) -> Self {
        Self {
            document,
            index,
            deleted,
        }
    }

    pub fn document(&self) -> &D {
        &self.document
    }

    pub fn index(&self) -> &TextIndex {
        &self.index
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted
    }

    /// Returns whether this record is visible to queries.
    pub fn is_active(&self) -> bool {
        !self.deleted
    }

    pub(crate) fn mark_deleted(&mut self) {
        self.deleted = true;
    }
}
