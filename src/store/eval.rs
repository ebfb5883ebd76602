//! Row-level evaluation of compiled conditions for the in-memory store.
//!
//! Comparisons follow SQL three-valued logic: any comparison against NULL
//! other than `= NULL` / `!= NULL` (rendered as `IS [NOT] NULL`) is false.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};
use serde_json::Value;
use std::cmp::Ordering;
use std::collections::HashMap;

use super::{Row, StoreError, StoreResult};
use crate::query_builder::{Condition, JoinConstraint, LogicalOperator, WhereClause};

/// A working row: unqualified columns plus `table.column` names of every
/// table taking part in the query
#[derive(Debug, Clone, Default)]
pub struct Tuple {
    pub plain: Row,
    qualified: HashMap<String, Value>,
}

impl Tuple {
    pub fn from_row(table: &str, row: &Row) -> Self {
        let mut tuple = Tuple::default();
        tuple.merge(table, row);
        tuple
    }

    /// Add another table's columns; later tables win on unqualified names
    pub fn merge(&mut self, table: &str, row: &Row) {
        for (column, value) in row {
            self.plain.insert(column.clone(), value.clone());
            self.qualified
                .insert(format!("{table}.{column}"), value.clone());
        }
    }

    /// Add a table's columns as NULLs (unmatched side of a LEFT JOIN)
    pub fn merge_nulls(&mut self, table: &str, columns: &[String]) {
        for column in columns {
            self.plain.entry(column.clone()).or_insert(Value::Null);
            self.qualified.insert(format!("{table}.{column}"), Value::Null);
        }
    }

    /// Missing columns read as NULL
    pub fn resolve(&self, column: &str) -> &Value {
        let found = if column.contains('.') {
            self.qualified.get(column)
        } else {
            self.plain.get(column)
        };
        found.unwrap_or(&Value::Null)
    }

    /// Columns of one joined table, unqualified
    pub fn table_columns(&self, table: &str) -> Row {
        let prefix = format!("{table}.");
        self.qualified
            .iter()
            .filter_map(|(name, value)| {
                name.strip_prefix(&prefix)
                    .map(|column| (column.to_string(), value.clone()))
            })
            .collect()
    }
}

/// Every group must hold
pub fn matches_all(tuple: &Tuple, clauses: &[WhereClause]) -> StoreResult<bool> {
    for clause in clauses {
        if !matches_clause(tuple, clause)? {
            return Ok(false);
        }
    }
    Ok(true)
}

pub fn matches_clause(tuple: &Tuple, clause: &WhereClause) -> StoreResult<bool> {
    if clause.conditions.is_empty() {
        return Ok(true);
    }
    match clause.operator {
        LogicalOperator::And => {
            for condition in &clause.conditions {
                if !matches_condition(tuple, condition)? {
                    return Ok(false);
                }
            }
            Ok(true)
        }
        LogicalOperator::Or => {
            for condition in &clause.conditions {
                if matches_condition(tuple, condition)? {
                    return Ok(true);
                }
            }
            Ok(false)
        }
    }
}

pub fn matches_condition(tuple: &Tuple, condition: &Condition) -> StoreResult<bool> {
    match condition {
        Condition::Simple {
            field,
            operator,
            value,
        } => compare_with(tuple.resolve(field), operator, value),
        Condition::In { field, values } => {
            let lhs = tuple.resolve(field);
            Ok(!lhs.is_null() && values.iter().any(|v| values_equal(lhs, v)))
        }
        Condition::NotIn { field, values } => {
            if values.is_empty() {
                return Ok(true);
            }
            let lhs = tuple.resolve(field);
            Ok(!lhs.is_null() && !values.iter().any(|v| values_equal(lhs, v)))
        }
        Condition::Between { field, start, end } => {
            let lhs = tuple.resolve(field);
            Ok(matches!(
                compare_values(lhs, start),
                Some(Ordering::Greater | Ordering::Equal)
            ) && matches!(
                compare_values(lhs, end),
                Some(Ordering::Less | Ordering::Equal)
            ))
        }
        Condition::Date {
            field,
            operator,
            value,
        } => {
            let (Some(lhs), Some(rhs)) = (parse_date(tuple.resolve(field)), parse_date(value))
            else {
                return Ok(false);
            };
            apply_ordering(operator, Some(lhs.cmp(&rhs)))
        }
        Condition::Month {
            field,
            operator,
            value,
        } => {
            let Some(lhs) = parse_date(tuple.resolve(field)) else {
                return Ok(false);
            };
            let month = Value::from(lhs.month());
            apply_ordering(operator, compare_values(&month, value))
        }
    }
}

/// Evaluate an ON constraint between two columns
pub fn matches_join(tuple: &Tuple, constraint: &JoinConstraint) -> StoreResult<bool> {
    let lhs = tuple.resolve(&constraint.first);
    let rhs = tuple.resolve(&constraint.second);
    if lhs.is_null() || rhs.is_null() {
        return Ok(false);
    }
    compare_with(lhs, &constraint.operator, rhs)
}

fn compare_with(lhs: &Value, operator: &str, rhs: &Value) -> StoreResult<bool> {
    let operator = operator.trim().to_lowercase();
    if rhs.is_null() {
        return match operator.as_str() {
            "=" => Ok(lhs.is_null()),
            "!=" | "<>" => Ok(!lhs.is_null()),
            ">" | ">=" | "<" | "<=" | "like" | "not like" => Ok(false),
            _ => Err(unsupported(&operator)),
        };
    }
    if lhs.is_null() {
        return match operator.as_str() {
            "=" | "!=" | "<>" | ">" | ">=" | "<" | "<=" | "like" | "not like" => Ok(false),
            _ => Err(unsupported(&operator)),
        };
    }
    match operator.as_str() {
        "like" => Ok(like(lhs, rhs)),
        "not like" => Ok(!like(lhs, rhs)),
        _ => apply_ordering(&operator, compare_values(lhs, rhs)),
    }
}

fn apply_ordering(operator: &str, ordering: Option<Ordering>) -> StoreResult<bool> {
    let Some(ordering) = ordering else {
        return match operator {
            "=" | "!=" | "<>" | ">" | ">=" | "<" | "<=" => Ok(false),
            other => Err(unsupported(other)),
        };
    };
    match operator {
        "=" => Ok(ordering == Ordering::Equal),
        "!=" | "<>" => Ok(ordering != Ordering::Equal),
        ">" => Ok(ordering == Ordering::Greater),
        ">=" => Ok(ordering != Ordering::Less),
        "<" => Ok(ordering == Ordering::Less),
        "<=" => Ok(ordering != Ordering::Greater),
        other => Err(unsupported(other)),
    }
}

fn unsupported(operator: &str) -> StoreError {
    StoreError::UnsupportedOperator {
        operator: operator.to_string(),
    }
}

fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        _ => None,
    }
}

/// Ordering between two non-null scalars, with numeric coercion of strings
pub fn compare_values(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::Null, _) | (_, Value::Null) => None,
        (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
        (Value::Array(_) | Value::Object(_), _) | (_, Value::Array(_) | Value::Object(_)) => {
            (a == b).then_some(Ordering::Equal)
        }
        _ => as_number(a)?.partial_cmp(&as_number(b)?),
    }
}

pub fn values_equal(a: &Value, b: &Value) -> bool {
    compare_values(a, b) == Some(Ordering::Equal)
}

/// Sort comparison; NULLs order first
pub fn compare_for_sort(a: &Value, b: &Value) -> Ordering {
    match (a.is_null(), b.is_null()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        (false, false) => compare_values(a, b).unwrap_or(Ordering::Equal),
    }
}

fn parse_date(value: &Value) -> Option<NaiveDate> {
    let raw = value.as_str()?.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.date_naive());
    }
    for format in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(dt.date());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
}

/// SQL LIKE with `%` and `_` wildcards, case-insensitive
fn like(value: &Value, pattern: &Value) -> bool {
    let text = match value {
        Value::String(s) => s.to_lowercase(),
        other => other.to_string().to_lowercase(),
    };
    let pattern = match pattern {
        Value::String(s) => s.to_lowercase(),
        other => other.to_string().to_lowercase(),
    };
    like_match(
        &text.chars().collect::<Vec<_>>(),
        &pattern.chars().collect::<Vec<_>>(),
    )
}

fn like_match(text: &[char], pattern: &[char]) -> bool {
    match pattern.split_first() {
        None => text.is_empty(),
        Some(('%', rest)) => (0..=text.len()).any(|i| like_match(&text[i..], rest)),
        Some(('_', rest)) => !text.is_empty() && like_match(&text[1..], rest),
        Some((c, rest)) => text.first() == Some(c) && like_match(&text[1..], rest),
    }
}
