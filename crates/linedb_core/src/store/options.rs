//! Find post-processing options and result shapes.
//!
//! # Responsibility
//! - Hold sort keys and projection fields for `Store::find`.
//! - Parse the `{"sort": {..}, "projection": {..}}` JSON options form.
//!
//! # Invariants
//! - Sort keys apply one after another as independent stable sorts, so the
//!   last key dominates the final order.
//! - Projection keeps exactly the requested fields present on a record.

use crate::model::document::Document;
use crate::model::record::IndexedRecord;
use crate::model::scalar::Scalar;
use crate::query::json::{expect_object, parse_field};
use crate::query::{QueryError, QueryResult};
use serde::Serialize;
use serde_json::{Map, Value};
use std::cmp::Ordering;
use std::str::FromStr;

/// Sort direction; `1` is ascending and `-1` descending in the JSON form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

impl SortOrder {
    pub fn from_direction(direction: i64) -> Option<Self> {
        match direction {
            1 => Some(Self::Ascending),
            -1 => Some(Self::Descending),
            _ => None,
        }
    }

    fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Self::Ascending => ordering,
            Self::Descending => ordering.reverse(),
        }
    }
}

/// Options accepted by `Store::find`.
#[derive(Debug, Clone, PartialEq)]
pub struct FindOptions<F> {
    pub sort: Vec<(F, SortOrder)>,
    pub projection: Option<Vec<F>>,
}

impl<F> Default for FindOptions<F> {
    fn default() -> Self {
        Self {
            sort: Vec::new(),
            projection: None,
        }
    }
}

impl<F> FindOptions<F> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a sort key. Later keys take precedence over earlier ones.
    pub fn sort_by(mut self, field: F, order: SortOrder) -> Self {
        self.sort.push((field, order));
        self
    }

    pub fn project(mut self, fields: impl IntoIterator<Item = F>) -> Self {
        self.projection = Some(fields.into_iter().collect());
        self
    }
}

/// Parses `{"sort": {"field": 1 | -1}, "projection": {"field": 1}}`.
///
/// Both keys are optional; any other key is rejected.
pub fn parse_find_options<F: FromStr>(value: &Value) -> QueryResult<FindOptions<F>> {
    let object = expect_object(value, "options")?;
    let mut options = FindOptions::new();

    for (key, entry) in object {
        match key.as_str() {
            "sort" => {
                for (name, direction) in expect_object(entry, "sort")? {
                    let order = direction
                        .as_i64()
                        .and_then(SortOrder::from_direction)
                        .ok_or_else(|| {
                            QueryError::InvalidShape(format!(
                                "sort direction for `{name}` must be 1 or -1, got {direction}"
                            ))
                        })?;
                    options = options.sort_by(parse_field::<F>(name)?, order);
                }
            }
            "projection" => {
                let mut fields = Vec::new();
                for (name, flag) in expect_object(entry, "projection")? {
                    if flag.as_i64() != Some(1) {
                        return Err(QueryError::InvalidShape(format!(
                            "projection flag for `{name}` must be 1, got {flag}"
                        )));
                    }
                    fields.push(parse_field::<F>(name)?);
                }
                options = options.project(fields);
            }
            other => {
                return Err(QueryError::InvalidShape(format!(
                    "unknown find option `{other}`"
                )))
            }
        }
    }

    Ok(options)
}

/// One record returned by `Store::find`.
#[derive(Debug, Clone, PartialEq)]
pub enum Found<D> {
    /// Whole document, returned when no projection was requested.
    Document(D),
    /// Requested subset of the document's serialized fields.
    Projected(Map<String, Value>),
}

impl<D: Serialize> Found<D> {
    pub fn document(&self) -> Option<&D> {
        match self {
            Self::Document(document) => Some(document),
            Self::Projected(_) => None,
        }
    }

    pub fn into_document(self) -> Option<D> {
        match self {
            Self::Document(document) => Some(document),
            Self::Projected(_) => None,
        }
    }

    pub fn projected(&self) -> Option<&Map<String, Value>> {
        match self {
            Self::Document(_) => None,
            Self::Projected(fields) => Some(fields),
        }
    }

    /// Converts this result into a JSON value.
    pub fn into_json(self) -> Result<Value, serde_json::Error> {
        match self {
            Self::Document(document) => serde_json::to_value(document),
            Self::Projected(fields) => Ok(Value::Object(fields)),
        }
    }
}

/// Sorts `records` by each key in turn.
///
/// A missing value orders below any present value, so records without the
/// key come first when ascending and last when descending.
///
/// # Errors
/// - `IncomparableScalars` when a key holds values of different kinds.
pub(crate) fn sort_records<D: Document>(
    records: &mut Vec<&IndexedRecord<D>>,
    sort: &[(D::Field, SortOrder)],
) -> QueryResult<()> {
    for (field, order) in sort {
        let mut keyed = records
            .iter()
            .map(|record| (record.document().scalar(field), *record))
            .collect::<Vec<_>>();
        ensure_single_kind(field.as_ref(), keyed.iter().filter_map(|(key, _)| key.as_ref()))?;

        keyed.sort_by(|(left, _), (right, _)| {
            order.apply(compare_keys(left.as_ref(), right.as_ref()))
        });
        *records = keyed.into_iter().map(|(_, record)| record).collect();
    }
    Ok(())
}

fn ensure_single_kind<'a>(field: &str, mut keys: impl Iterator<Item = &'a Scalar>) -> QueryResult<()> {
    let Some(first) = keys.next() else {
        return Ok(());
    };
    for key in keys {
        if key.kind() != first.kind() {
            return Err(QueryError::IncomparableScalars {
                field: field.to_string(),
                left: first.kind(),
                right: key.kind(),
            });
        }
    }
    Ok(())
}

fn compare_keys(left: Option<&Scalar>, right: Option<&Scalar>) -> Ordering {
    match (left, right) {
        (Some(left), Some(right)) => left.compare(right).unwrap_or(Ordering::Equal),
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Reduces `document` to the serialized values of `fields`.
pub(crate) fn project<D: Document>(document: &D, fields: &[D::Field]) -> QueryResult<Map<String, Value>> {
    let Value::Object(serialized) = serde_json::to_value(document)? else {
        return Err(QueryError::InvalidShape(
            "projection requires documents that serialize to JSON objects".to_string(),
        ));
    };

    let mut projected = Map::new();
    for field in fields {
        let name = field.as_ref();
        if let Some(value) = serialized.get(name) {
            projected.insert(name.to_string(), value.clone());
        }
    }
    Ok(projected)
}
