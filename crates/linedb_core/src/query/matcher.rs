//! Recursive query evaluation against one indexed record.
//!
//! # Invariants
//! - Evaluation is pure: records are never mutated here.
//! - `And`/`Or` evaluate left-to-right and short-circuit.
//! - A field with no scalar value never satisfies any operator.

use super::expr::{FieldOperator, Query, QueryError, QueryResult};
use crate::index::{tokenize, TextIndex};
use crate::model::document::Document;
use crate::model::record::IndexedRecord;
use crate::model::scalar::Scalar;
use std::cmp::Ordering;

/// Returns whether `record` satisfies `query`.
///
/// Deleted state is not considered here; callers filter tombstones first.
///
/// # Errors
/// - `IncomparableScalars` when `$gt`/`$lt` meets a field of another kind.
pub fn matches<D: Document>(query: &Query<D::Field>, record: &IndexedRecord<D>) -> QueryResult<bool> {
    match query {
        Query::And(queries) => {
            for subquery in queries {
                if !matches(subquery, record)? {
                    return Ok(false);
                }
            }
            Ok(true)
        }
        Query::Or(queries) => {
            for subquery in queries {
                if matches(subquery, record)? {
                    return Ok(true);
                }
            }
            Ok(false)
        }
        Query::Text(text) => Ok(text_matches(text, record.index())),
        Query::Fields(predicates) => {
            for (field, operator) in predicates {
                let value = record.document().scalar(field);
                if !operator_matches(field.as_ref(), operator, value.as_ref())? {
                    return Ok(false);
                }
            }
            Ok(true)
        }
    }
}

fn text_matches(text: &str, index: &TextIndex) -> bool {
    let words = tokenize(text).collect::<Vec<_>>();
    index.contains_all(words.iter().map(String::as_str))
}

fn operator_matches(field: &str, operator: &FieldOperator, value: Option<&Scalar>) -> QueryResult<bool> {
    let Some(value) = value else {
        return Ok(false);
    };

    match operator {
        FieldOperator::Eq(literal) => Ok(value == literal),
        FieldOperator::Gt(literal) => Ok(order(field, value, literal)? == Ordering::Greater),
        FieldOperator::Lt(literal) => Ok(order(field, value, literal)? == Ordering::Less),
        FieldOperator::In(literals) => Ok(literals.contains(value)),
    }
}

fn order(field: &str, value: &Scalar, literal: &Scalar) -> QueryResult<Ordering> {
    value
        .compare(literal)
        .ok_or_else(|| QueryError::IncomparableScalars {
            field: field.to_string(),
            left: value.kind(),
            right: literal.kind(),
        })
}
