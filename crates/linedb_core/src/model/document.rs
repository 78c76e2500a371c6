//! Caller-defined document contract.
//!
//! # Responsibility
//! - Restrict queryable and sortable fields to a typed field set.
//! - Expose scalar field values to the matcher without reflection.
//!
//! # Invariants
//! - `scalar` returns `None` when the field holds no scalar value.
//! - Full-text fields must resolve to `Scalar::String`.

use super::scalar::Scalar;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt::Debug;

/// A record shape that can be stored, indexed and queried.
///
/// `Field` names the fields callers may reference from queries, sort keys,
/// projections and full-text configuration. Its `AsRef<str>` value must be
/// the key the field serializes under, since projection works on the
/// serialized form.
pub trait Document: Serialize + DeserializeOwned + Clone {
    type Field: AsRef<str> + Clone + Debug + PartialEq;

    /// Returns the scalar value held by `field`.
    fn scalar(&self, field: &Self::Field) -> Option<Scalar>;
}

/// Schemaless document backed by a JSON object.
///
/// Any top-level key is a field; values that are not scalars are invisible
/// to field predicates but still available to projection.
pub type JsonDocument = Map<String, Value>;

impl Document for JsonDocument {
    type Field = String;

    fn scalar(&self, field: &String) -> Option<Scalar> {
        self.get(field).and_then(Scalar::from_json)
    }
}
