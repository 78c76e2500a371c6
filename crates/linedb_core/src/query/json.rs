//! JSON query form.
//!
//! # Responsibility
//! - Parse `{"$and": [..]}`, `{"$or": [..]}`, `{"$text": ".."}` and
//!   `{"field": {"$eq": ..}}` objects into typed queries.
//!
//! # Invariants
//! - Unknown operators and fields fail the parse; they never match silently.
//! - Object key order is preserved, so field predicates keep written order.

use super::expr::{FieldOperator, Query, QueryError, QueryResult};
use crate::model::scalar::Scalar;
use serde_json::{Map, Value};
use std::str::FromStr;

const OP_AND: &str = "$and";
const OP_OR: &str = "$or";
const OP_TEXT: &str = "$text";
const OP_EQ: &str = "$eq";
const OP_GT: &str = "$gt";
const OP_LT: &str = "$lt";
const OP_IN: &str = "$in";

/// Parses a JSON query object.
///
/// Field names are resolved through `F::from_str`; a failed parse reports
/// `QueryError::UnknownField`.
pub fn parse_query<F: FromStr>(value: &Value) -> QueryResult<Query<F>> {
    let object = expect_object(value, "query")?;

    if let Some(subqueries) = object.get(OP_AND) {
        ensure_single_key(object, OP_AND)?;
        return parse_query_list(subqueries, OP_AND).map(Query::And);
    }

    if let Some(subqueries) = object.get(OP_OR) {
        ensure_single_key(object, OP_OR)?;
        return parse_query_list(subqueries, OP_OR).map(Query::Or);
    }

    if let Some(text) = object.get(OP_TEXT) {
        ensure_single_key(object, OP_TEXT)?;
        let text = text
            .as_str()
            .ok_or_else(|| QueryError::InvalidShape(format!("`{OP_TEXT}` expects a string")))?;
        return Ok(Query::Text(text.to_string()));
    }

    let mut predicates = Vec::with_capacity(object.len());
    for (name, operator) in object {
        let field = parse_field::<F>(name)?;
        predicates.push((field, parse_operator(operator)?));
    }
    Ok(Query::Fields(predicates))
}

/// Parses a JSON operator object such as `{"$gt": 20}`.
pub fn parse_operator(value: &Value) -> QueryResult<FieldOperator> {
    let unrecognized = || QueryError::UnrecognizedOperator(value.to_string());
    let object = value.as_object().ok_or_else(unrecognized)?;
    if object.len() != 1 {
        return Err(unrecognized());
    }
    let Some((name, operand)) = object.iter().next() else {
        return Err(unrecognized());
    };

    match name.as_str() {
        OP_EQ => parse_literal(operand, OP_EQ).map(FieldOperator::Eq),
        OP_GT => parse_literal(operand, OP_GT).map(FieldOperator::Gt),
        OP_LT => parse_literal(operand, OP_LT).map(FieldOperator::Lt),
        OP_IN => {
            let items = operand
                .as_array()
                .ok_or_else(|| QueryError::InvalidShape(format!("`{OP_IN}` expects an array")))?;
            items
                .iter()
                .map(|item| parse_literal(item, OP_IN))
                .collect::<QueryResult<Vec<_>>>()
                .map(FieldOperator::In)
        }
        _ => Err(unrecognized()),
    }
}

fn parse_query_list<F: FromStr>(value: &Value, keyword: &str) -> QueryResult<Vec<Query<F>>> {
    value
        .as_array()
        .ok_or_else(|| QueryError::InvalidShape(format!("`{keyword}` expects an array")))?
        .iter()
        .map(parse_query::<F>)
        .collect()
}

fn parse_literal(value: &Value, operator: &str) -> QueryResult<Scalar> {
    Scalar::from_json(value).ok_or_else(|| {
        QueryError::InvalidShape(format!(
            "`{operator}` expects boolean, number or string literals, got {value}"
        ))
    })
}

pub(crate) fn parse_field<F: FromStr>(name: &str) -> QueryResult<F> {
    name.parse::<F>()
        .map_err(|_| QueryError::UnknownField(name.to_string()))
}

pub(crate) fn expect_object<'a>(value: &'a Value, what: &str) -> QueryResult<&'a Map<String, Value>> {
    value
        .as_object()
        .ok_or_else(|| QueryError::InvalidShape(format!("{what} must be a JSON object")))
}

fn ensure_single_key(object: &Map<String, Value>, keyword: &str) -> QueryResult<()> {
    if object.len() == 1 {
        return Ok(());
    }
    Err(QueryError::InvalidShape(format!(
        "`{keyword}` cannot be combined with other keys"
    )))
}
