//! # Descriptor Ingestion
//!
//! Normalizes a loosely-shaped JSON descriptor into [`FilterDescriptor`].
//! Comma-delimited strings and positional arrays both collapse to the same
//! structured form here, so the compiler never sees the dual encodings.
//!
//! Falsy fragment values (`null`, `false`, `0`, `""`, `[]`, `{}`) mean "key
//! absent" and are dropped before any shape check runs.

use serde_json::{Map, Value};

use super::descriptor::{FilterDescriptor, JoinSpec, MembershipFragment, RelationSpec};
use super::predicate::{Between, OrderSpec, Predicate, SortDirection};
use crate::error::{QueryScopeError, Result};

impl FilterDescriptor {
    /// Parse a JSON descriptor such as
    /// `{"where": [["status", "=", "active"]], "order": "created_at,desc"}`
    pub fn from_json(value: &Value) -> Result<Self> {
        let object = match value {
            Value::Null => return Ok(Self::default()),
            Value::Object(object) => object,
            other => {
                return Err(QueryScopeError::malformed(
                    "descriptor",
                    format!("expected an object, found {other}"),
                ))
            }
        };

        Ok(Self {
            relation: fragment(object, "relation")
                .map(|v| parse_list(v, "relation", parse_relation))
                .transpose()?,
            join: fragment(object, "join")
                .map(|v| parse_list(v, "join", parse_join))
                .transpose()?,
            where_in: fragment(object, "whereIn")
                .map(|v| parse_membership(v, "whereIn"))
                .transpose()?,
            where_not_in: fragment(object, "whereNotIn")
                .map(|v| parse_membership(v, "whereNotIn"))
                .transpose()?,
            where_: fragment(object, "where")
                .map(|v| parse_list(v, "where", |p| parse_predicate(p, "where")))
                .transpose()?,
            or_where: fragment(object, "orWhere")
                .map(|v| parse_list(v, "orWhere", |p| parse_predicate(p, "orWhere")))
                .transpose()?,
            where_date: fragment(object, "whereDate")
                .map(|v| parse_predicate(v, "whereDate"))
                .transpose()?,
            where_month: fragment(object, "whereMonth")
                .map(|v| parse_predicate(v, "whereMonth"))
                .transpose()?,
            between: fragment(object, "between").map(parse_between).transpose()?,
            order: fragment(object, "order")
                .map(|v| parse_order(v, "order"))
                .transpose()?,
            limit: fragment(object, "limit")
                .map(|v| parse_limit(v, "limit"))
                .transpose()?,
        })
    }
}

/// Parse a flat predicate list, as used by the simple read entry points
pub fn parse_predicates(value: &Value) -> Result<Vec<Predicate>> {
    if !is_truthy(value) {
        return Ok(Vec::new());
    }
    parse_list(value, "filter", |p| parse_predicate(p, "filter"))
}

/// Truthiness of a fragment value; falsy fragments are treated as absent
pub(crate) fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !(s.is_empty() || s == "0"),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

fn fragment<'a>(object: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    object.get(key).filter(|v| is_truthy(v))
}

fn parse_list<T, F>(value: &Value, fragment: &str, parse_item: F) -> Result<Vec<T>>
where
    F: Fn(&Value) -> Result<T>,
{
    let items = value.as_array().ok_or_else(|| {
        QueryScopeError::malformed(fragment, format!("expected a list, found {value}"))
    })?;
    items.iter().map(parse_item).collect()
}

/// Positional tuple with at least `arity` elements; extra elements are ignored
fn tuple<'a>(value: &'a Value, fragment: &str, arity: usize) -> Result<&'a [Value]> {
    let items = value.as_array().ok_or_else(|| {
        QueryScopeError::malformed(fragment, format!("expected a list, found {value}"))
    })?;
    if items.len() < arity {
        return Err(QueryScopeError::malformed(
            fragment,
            format!("expected {arity} components, found {}", items.len()),
        ));
    }
    Ok(&items[..arity])
}

/// Comma string that must split into exactly `arity` tokens
fn split_tokens(raw: &str, fragment: &str, arity: usize) -> Result<Vec<String>> {
    let tokens: Vec<String> = raw.split(',').map(|t| t.trim().to_string()).collect();
    if tokens.len() != arity {
        return Err(QueryScopeError::malformed(
            fragment,
            format!(
                "expected {arity} comma-separated tokens, found {}",
                tokens.len()
            ),
        ));
    }
    Ok(tokens)
}

fn string_component(value: &Value, fragment: &str, what: &str) -> Result<String> {
    value.as_str().map(str::to_string).ok_or_else(|| {
        QueryScopeError::malformed(fragment, format!("{what} must be a string, found {value}"))
    })
}

fn parse_predicate(value: &Value, fragment: &str) -> Result<Predicate> {
    if let Value::Object(object) = value {
        let column = object
            .get("column")
            .ok_or_else(|| QueryScopeError::malformed(fragment, "missing column"))?;
        let operator = object
            .get("operator")
            .ok_or_else(|| QueryScopeError::malformed(fragment, "missing operator"))?;
        return Ok(Predicate::new(
            string_component(column, fragment, "column")?,
            string_component(operator, fragment, "operator")?,
            object.get("value").cloned().unwrap_or(Value::Null),
        ));
    }

    let parts = tuple(value, fragment, 3)?;
    Ok(Predicate::new(
        string_component(&parts[0], fragment, "column")?,
        string_component(&parts[1], fragment, "operator")?,
        parts[2].clone(),
    ))
}

fn parse_join(value: &Value) -> Result<JoinSpec> {
    let parts = tuple(value, "join", 4)?;
    Ok(JoinSpec::new(
        string_component(&parts[0], "join", "table")?,
        string_component(&parts[1], "join", "table column")?,
        string_component(&parts[2], "join", "operator")?,
        string_component(&parts[3], "join", "source column")?,
    ))
}

fn parse_membership(value: &Value, fragment: &str) -> Result<MembershipFragment> {
    let items = value.as_array().ok_or_else(|| {
        QueryScopeError::malformed(fragment, format!("expected a list, found {value}"))
    })?;
    MembershipFragment::from_items(fragment, items.clone())
}

fn parse_order(value: &Value, fragment: &str) -> Result<OrderSpec> {
    let (column, direction) = match value {
        Value::String(raw) => {
            let tokens = split_tokens(raw, fragment, 2)?;
            (tokens[0].clone(), tokens[1].clone())
        }
        _ => {
            let parts = tuple(value, fragment, 2)?;
            (
                string_component(&parts[0], fragment, "column")?,
                string_component(&parts[1], fragment, "direction")?,
            )
        }
    };
    Ok(OrderSpec::new(column, SortDirection::parse(&direction)?))
}

fn parse_between(value: &Value) -> Result<Between> {
    match value {
        Value::String(raw) => {
            let tokens = split_tokens(raw, "between", 3)?;
            Ok(Between::new(
                tokens[0].clone(),
                Value::String(tokens[1].clone()),
                Value::String(tokens[2].clone()),
            ))
        }
        _ => {
            let parts = tuple(value, "between", 3)?;
            Ok(Between::new(
                string_component(&parts[0], "between", "column")?,
                parts[1].clone(),
                parts[2].clone(),
            ))
        }
    }
}

fn parse_limit(value: &Value, fragment: &str) -> Result<u64> {
    let parsed = match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse::<u64>().ok(),
        _ => None,
    };
    parsed.ok_or_else(|| {
        QueryScopeError::malformed(fragment, format!("expected a positive integer, found {value}"))
    })
}

fn parse_fields(value: &Value) -> Result<Vec<String>> {
    match value {
        Value::String(raw) => Ok(raw.split(',').map(|f| f.trim().to_string()).collect()),
        _ => parse_list(value, "relation.field", |f| {
            string_component(f, "relation.field", "field")
        }),
    }
}

fn parse_relation(value: &Value) -> Result<RelationSpec> {
    let object = value.as_object().ok_or_else(|| {
        QueryScopeError::malformed("relation", format!("expected an object, found {value}"))
    })?;
    let name = object
        .get("name")
        .ok_or_else(|| QueryScopeError::malformed("relation", "missing relation name"))?;

    Ok(RelationSpec {
        name: string_component(name, "relation", "name")?,
        fields: fragment(object, "field").map(parse_fields).transpose()?,
        conditions: fragment(object, "condition")
            .map(|v| {
                parse_list(v, "relation.condition", |p| {
                    parse_predicate(p, "relation.condition")
                })
            })
            .transpose()?
            .unwrap_or_default(),
        limit: fragment(object, "limit")
            .map(|v| parse_limit(v, "relation.limit"))
            .transpose()?,
        order: fragment(object, "order")
            .map(|v| parse_order(v, "relation.order"))
            .transpose()?,
    })
}
