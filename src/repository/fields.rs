//! # Field Accessors
//!
//! Typed getters and setters for the columns a repository lets callers
//! write by name. Fields are validated when registered, so updates such as
//! [`Repository::update_by_field`](super::Repository::update_by_field) never
//! perform an unchecked dynamic lookup.

use serde_json::Value;
use std::collections::HashMap;

use crate::error::{QueryScopeError, Result};
use crate::store::Row;

/// Value shape a field accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Integer,
    /// `true`/`false`, or the integers 0 and 1
    Boolean,
    Number,
    Text,
    Any,
}

impl FieldKind {
    fn accepts(&self, value: &Value) -> bool {
        match self {
            FieldKind::Integer => value.is_i64() || value.is_u64(),
            FieldKind::Boolean => {
                value.is_boolean() || matches!(value.as_i64(), Some(0) | Some(1))
            }
            FieldKind::Number => value.is_number(),
            FieldKind::Text => value.is_string(),
            FieldKind::Any => true,
        }
    }
}

/// Accessor for one registered column
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldAccessor {
    name: String,
    kind: FieldKind,
    nullable: bool,
}

impl FieldAccessor {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> FieldKind {
        self.kind
    }

    /// Current value; a missing column reads as `null`
    pub fn get<'a>(&self, row: &'a Row) -> &'a Value {
        row.get(&self.name).unwrap_or(&Value::Null)
    }

    pub fn set(&self, row: &mut Row, value: Value) -> Result<()> {
        self.validate(&value)?;
        row.insert(self.name.clone(), value);
        Ok(())
    }

    pub fn validate(&self, value: &Value) -> Result<()> {
        if value.is_null() {
            if self.nullable {
                return Ok(());
            }
            return Err(self.invalid("null is not allowed"));
        }
        if !self.kind.accepts(value) {
            return Err(self.invalid(format!("{value} is not a valid {:?}", self.kind)));
        }
        Ok(())
    }

    fn invalid(&self, reason: impl Into<String>) -> QueryScopeError {
        QueryScopeError::InvalidFieldValue {
            field: self.name.clone(),
            reason: reason.into(),
        }
    }
}

/// Columns a repository exposes for by-name updates
#[derive(Debug, Clone, Default)]
pub struct FieldRegistry {
    fields: HashMap<String, FieldAccessor>,
}

impl FieldRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a non-nullable field
    pub fn register(self, name: &str, kind: FieldKind) -> Result<Self> {
        self.insert(name, kind, false)
    }

    pub fn register_nullable(self, name: &str, kind: FieldKind) -> Result<Self> {
        self.insert(name, kind, true)
    }

    fn insert(mut self, name: &str, kind: FieldKind, nullable: bool) -> Result<Self> {
        let valid_name = !name.is_empty()
            && name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_');
        if !valid_name {
            return Err(QueryScopeError::Configuration(format!(
                "invalid field name `{name}`"
            )));
        }
        if self.fields.contains_key(name) {
            return Err(QueryScopeError::Configuration(format!(
                "field `{name}` is already registered"
            )));
        }

        self.fields.insert(
            name.to_string(),
            FieldAccessor {
                name: name.to_string(),
                kind,
                nullable,
            },
        );
        Ok(self)
    }

    pub fn accessor(&self, name: &str) -> Result<&FieldAccessor> {
        self.fields
            .get(name)
            .ok_or_else(|| QueryScopeError::UnknownField {
                field: name.to_string(),
            })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn registry() -> FieldRegistry {
        FieldRegistry::new()
            .register("active", FieldKind::Boolean)
            .unwrap()
            .register("title", FieldKind::Text)
            .unwrap()
            .register_nullable("score", FieldKind::Number)
            .unwrap()
    }

    #[test]
    fn test_registration_validates_names() {
        assert!(matches!(
            FieldRegistry::new().register("name; drop", FieldKind::Text),
            Err(QueryScopeError::Configuration(_))
        ));
        assert!(matches!(
            registry().register("title", FieldKind::Any),
            Err(QueryScopeError::Configuration(_))
        ));
    }

    #[test]
    fn test_unknown_field() {
        let err = registry().accessor("missing").unwrap_err();
        assert_eq!(
            err,
            QueryScopeError::UnknownField {
                field: "missing".to_string()
            }
        );
    }

    #[test]
    fn test_typed_set() {
        let registry = registry();
        let mut row = Row::new();

        let active = registry.accessor("active").unwrap();
        active.set(&mut row, json!(1)).unwrap();
        assert_eq!(active.get(&row), &json!(1));
        assert!(active.set(&mut row, json!(2)).is_err());

        let title = registry.accessor("title").unwrap();
        assert!(matches!(
            title.set(&mut row, json!(5)),
            Err(QueryScopeError::InvalidFieldValue { .. })
        ));
        assert!(title.set(&mut row, Value::Null).is_err());

        let score = registry.accessor("score").unwrap();
        assert_eq!(score.get(&row), &Value::Null);
        score.set(&mut row, Value::Null).unwrap();
    }
}
