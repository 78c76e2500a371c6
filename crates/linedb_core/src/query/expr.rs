//! Query expression algebra.
//!
//! # Responsibility
//! - Define the recursive filter language accepted by the store.
//! - Provide builder helpers so callers rarely spell out variants.
//!
//! # Invariants
//! - `And([])` matches every record, `Or([])` matches none.
//! - `Fields` predicates are an implicit conjunction, evaluated in order.

use crate::model::scalar::{Scalar, ScalarKind};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type QueryResult<T> = Result<T, QueryError>;

/// Errors raised while building or evaluating a query.
///
/// Evaluation errors are local to the failing call and never leave the
/// store partially mutated.
#[derive(Debug)]
pub enum QueryError {
    /// `$gt`/`$lt` or a sort key compared values of different kinds.
    IncomparableScalars {
        field: String,
        left: ScalarKind,
        right: ScalarKind,
    },
    /// Operator object was not one of `$eq|$gt|$lt|$in`.
    UnrecognizedOperator(String),
    /// Field name is not part of the document's field set.
    UnknownField(String),
    /// JSON query or options had the wrong structure.
    InvalidShape(String),
    /// A matched document could not be serialized for projection.
    Serialization(serde_json::Error),
}

impl Display for QueryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::IncomparableScalars { field, left, right } => write!(
                f,
                "cannot compare {left} with {right} on field `{field}`"
            ),
            Self::UnrecognizedOperator(operator) => {
                write!(f, "unrecognized field operator: {operator}")
            }
            Self::UnknownField(field) => write!(f, "unknown query field `{field}`"),
            Self::InvalidShape(message) => write!(f, "invalid query shape: {message}"),
            Self::Serialization(err) => write!(f, "failed to serialize document: {err}"),
        }
    }
}

impl Error for QueryError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Serialization(err) => Some(err),
            Self::IncomparableScalars { .. }
            | Self::UnrecognizedOperator(_)
            | Self::UnknownField(_)
            | Self::InvalidShape(_) => None,
        }
    }
}

impl From<serde_json::Error> for QueryError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialization(value)
    }
}

/// Predicate applied to one field value.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldOperator {
    Eq(Scalar),
    Gt(Scalar),
    Lt(Scalar),
    In(Vec<Scalar>),
}

impl FieldOperator {
    pub fn eq(value: impl Into<Scalar>) -> Self {
        Self::Eq(value.into())
    }

    pub fn gt(value: impl Into<Scalar>) -> Self {
        Self::Gt(value.into())
    }

    pub fn lt(value: impl Into<Scalar>) -> Self {
        Self::Lt(value.into())
    }

    pub fn one_of<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Scalar>,
    {
        Self::In(values.into_iter().map(Into::into).collect())
    }
}

/// Recursive filter over documents whose queryable fields are `F`.
#[derive(Debug, Clone, PartialEq)]
pub enum Query<F> {
    And(Vec<Query<F>>),
    Or(Vec<Query<F>>),
    Text(String),
    Fields(Vec<(F, FieldOperator)>),
}

impl<F> Query<F> {
    /// Matches every active record.
    pub fn all() -> Self {
        Self::And(Vec::new())
    }

    pub fn and(queries: impl IntoIterator<Item = Query<F>>) -> Self {
        Self::And(queries.into_iter().collect())
    }

    pub fn or(queries: impl IntoIterator<Item = Query<F>>) -> Self {
        Self::Or(queries.into_iter().collect())
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    pub fn field(field: F, operator: FieldOperator) -> Self {
        Self::Fields(vec![(field, operator)])
    }

    /// Adds one more field predicate to this query.
    ///
    /// Extends an existing `Fields` node in place; any other node is wrapped
    /// in an `And` together with the new predicate.
    pub fn with_field(self, field: F, operator: FieldOperator) -> Self {
        match self {
            Self::Fields(mut predicates) => {
                predicates.push((field, operator));
                Self::Fields(predicates)
            }
            other => Self::And(vec![other, Self::field(field, operator)]),
        }
    }
}
