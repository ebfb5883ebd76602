//! # Predicate Model
//!
//! Column/operator/value triples plus the small structured fragments
//! (ordering, inclusive ranges) that descriptors normalize into.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use crate::error::{QueryScopeError, Result};

/// A column/operator/value triple.
///
/// A JSON `null` value is the absent marker: top-level scopes drop such a
/// predicate instead of sending it to the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Predicate {
    pub column: String,
    pub operator: String,
    pub value: Value,
}

impl Predicate {
    pub fn new(column: impl Into<String>, operator: impl Into<String>, value: Value) -> Self {
        Self {
            column: column.into(),
            operator: operator.into(),
            value,
        }
    }

    /// Equality predicate
    pub fn eq(column: impl Into<String>, value: Value) -> Self {
        Self::new(column, "=", value)
    }

    /// Predicate with the absent marker as its value
    pub fn absent(column: impl Into<String>, operator: impl Into<String>) -> Self {
        Self::new(column, operator, Value::Null)
    }

    /// A predicate is active iff its value is not the absent marker
    pub fn is_active(&self) -> bool {
        !self.value.is_null()
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.column, self.operator, self.value)
    }
}

/// Sort direction for ordering fragments
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    /// Parse a direction token, case-insensitively
    pub fn parse(token: &str) -> Result<Self> {
        match token.trim().to_lowercase().as_str() {
            "asc" => Ok(SortDirection::Asc),
            "desc" => Ok(SortDirection::Desc),
            other => Err(QueryScopeError::malformed(
                "order",
                format!("invalid order direction: {other}"),
            )),
        }
    }

    pub fn as_sql(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }

    pub fn is_ascending(&self) -> bool {
        matches!(self, SortDirection::Asc)
    }
}

/// Single-column ordering
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderSpec {
    pub column: String,
    pub direction: SortDirection,
}

impl OrderSpec {
    pub fn new(column: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            column: column.into(),
            direction,
        }
    }

    pub fn asc(column: impl Into<String>) -> Self {
        Self::new(column, SortDirection::Asc)
    }

    pub fn desc(column: impl Into<String>) -> Self {
        Self::new(column, SortDirection::Desc)
    }
}

/// Inclusive range on one column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Between {
    pub column: String,
    pub start: Value,
    pub end: Value,
}

impl Between {
    pub fn new(column: impl Into<String>, start: Value, end: Value) -> Self {
        Self {
            column: column.into(),
            start,
            end,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_predicate_activity() {
        assert!(Predicate::eq("status", json!("active")).is_active());
        assert!(Predicate::new("age", ">", json!(0)).is_active());
        assert!(Predicate::new("flag", "=", json!(false)).is_active());
        assert!(!Predicate::absent("age", ">").is_active());
    }

    #[test]
    fn test_sort_direction_parse() {
        assert_eq!(SortDirection::parse("asc").unwrap(), SortDirection::Asc);
        assert_eq!(SortDirection::parse(" DESC ").unwrap(), SortDirection::Desc);
        assert!(matches!(
            SortDirection::parse("sideways"),
            Err(QueryScopeError::MalformedFilterFragment { .. })
        ));
    }

    #[test]
    fn test_predicate_display() {
        let predicate = Predicate::new("total", ">", json!(10));
        assert_eq!(predicate.to_string(), "total > 10");
    }
}
