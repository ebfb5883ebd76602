//! # Filter Descriptor
//!
//! The caller-supplied bag of optional fragments that the compiler consumes.
//! Every fragment is already in canonical structured form; comma strings and
//! loose JSON are normalized by [`FilterDescriptor::from_json`](super::parse).

use serde_json::Value;

use super::predicate::{Between, OrderSpec, Predicate};
use crate::error::{QueryScopeError, Result};

/// Eager-load request for a named (optionally dot-qualified) relation
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RelationSpec {
    pub name: String,
    /// Projected columns of the related rows
    pub fields: Option<Vec<String>>,
    /// Applied unconditionally: absent values are *not* skipped here
    pub conditions: Vec<Predicate>,
    /// Related rows loaded per parent
    pub limit: Option<u64>,
    pub order: Option<OrderSpec>,
}

impl RelationSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields = Some(fields.into_iter().map(Into::into).collect());
        self
    }

    pub fn condition(mut self, predicate: Predicate) -> Self {
        self.conditions.push(predicate);
        self
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn order(mut self, order: OrderSpec) -> Self {
        self.order = Some(order);
        self
    }
}

/// Raw inner-join quad, applied in descriptor order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinSpec {
    pub table: String,
    pub table_column: String,
    pub operator: String,
    pub source_column: String,
}

impl JoinSpec {
    pub fn new(
        table: impl Into<String>,
        table_column: impl Into<String>,
        operator: impl Into<String>,
        source_column: impl Into<String>,
    ) -> Self {
        Self {
            table: table.into(),
            table_column: table_column.into(),
            operator: operator.into(),
            source_column: source_column.into(),
        }
    }
}

/// `whereIn` / `whereNotIn` fragment.
///
/// Kept as the raw element list: anything other than exactly two elements is
/// ignored by the compiler rather than rejected.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MembershipFragment {
    items: Vec<Value>,
}

impl MembershipFragment {
    /// Well-formed (column, value-or-collection) pair
    pub fn new(column: impl Into<String>, values: Value) -> Self {
        Self {
            items: vec![Value::String(column.into()), values],
        }
    }

    /// Build from raw elements; the column is checked only for two-element lists
    pub fn from_items(fragment: &str, items: Vec<Value>) -> Result<Self> {
        if items.len() == 2 && !items[0].is_string() {
            return Err(QueryScopeError::malformed(
                fragment,
                format!("column must be a string, found {}", items[0]),
            ));
        }
        Ok(Self { items })
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Column and coerced collection, or `None` when the arity is not two
    pub fn pair(&self) -> Option<(&str, Vec<Value>)> {
        match self.items.as_slice() {
            [column, values] => {
                let column = column.as_str()?;
                Some((column, coerce_collection(values)))
            }
            _ => None,
        }
    }
}

/// Scalar becomes a singleton, null becomes empty, arrays pass through
fn coerce_collection(value: &Value) -> Vec<Value> {
    match value {
        Value::Array(items) => items.clone(),
        Value::Null => Vec::new(),
        other => vec![other.clone()],
    }
}

/// Optional-keyed bag of query fragments
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FilterDescriptor {
    pub relation: Option<Vec<RelationSpec>>,
    pub join: Option<Vec<JoinSpec>>,
    pub where_in: Option<MembershipFragment>,
    pub where_not_in: Option<MembershipFragment>,
    pub where_: Option<Vec<Predicate>>,
    pub or_where: Option<Vec<Predicate>>,
    pub where_date: Option<Predicate>,
    pub where_month: Option<Predicate>,
    pub between: Option<Between>,
    pub order: Option<OrderSpec>,
    pub limit: Option<u64>,
}

impl FilterDescriptor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn relation(mut self, spec: RelationSpec) -> Self {
        self.relation.get_or_insert_with(Vec::new).push(spec);
        self
    }

    pub fn join(mut self, spec: JoinSpec) -> Self {
        self.join.get_or_insert_with(Vec::new).push(spec);
        self
    }

    pub fn where_in(mut self, column: impl Into<String>, values: Value) -> Self {
        self.where_in = Some(MembershipFragment::new(column, values));
        self
    }

    pub fn where_not_in(mut self, column: impl Into<String>, values: Value) -> Self {
        self.where_not_in = Some(MembershipFragment::new(column, values));
        self
    }

    pub fn where_(mut self, predicate: Predicate) -> Self {
        self.where_.get_or_insert_with(Vec::new).push(predicate);
        self
    }

    pub fn or_where(mut self, predicate: Predicate) -> Self {
        self.or_where.get_or_insert_with(Vec::new).push(predicate);
        self
    }

    pub fn where_date(mut self, predicate: Predicate) -> Self {
        self.where_date = Some(predicate);
        self
    }

    pub fn where_month(mut self, predicate: Predicate) -> Self {
        self.where_month = Some(predicate);
        self
    }

    pub fn between(mut self, between: Between) -> Self {
        self.between = Some(between);
        self
    }

    pub fn order(mut self, order: OrderSpec) -> Self {
        self.order = Some(order);
        self
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    /// True when no fragment key is present
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_membership_pair_coercion() {
        let scalar = MembershipFragment::new("id", json!(7));
        assert_eq!(scalar.pair(), Some(("id", vec![json!(7)])));

        let list = MembershipFragment::new("id", json!([1, 2]));
        assert_eq!(list.pair(), Some(("id", vec![json!(1), json!(2)])));

        let null = MembershipFragment::new("id", Value::Null);
        assert_eq!(null.pair(), Some(("id", vec![])));
    }

    #[test]
    fn test_membership_wrong_arity_has_no_pair() {
        let short = MembershipFragment::from_items("whereIn", vec![json!("id")]).unwrap();
        assert!(short.pair().is_none());

        let long =
            MembershipFragment::from_items("whereIn", vec![json!("id"), json!(1), json!(2)])
                .unwrap();
        assert!(long.pair().is_none());
    }

    #[test]
    fn test_membership_rejects_non_string_column() {
        let result = MembershipFragment::from_items("whereIn", vec![json!(1), json!([2])]);
        assert!(matches!(
            result,
            Err(QueryScopeError::MalformedFilterFragment { .. })
        ));
    }

    #[test]
    fn test_descriptor_builder() {
        let descriptor = FilterDescriptor::new()
            .where_(Predicate::eq("status", json!("active")))
            .where_(Predicate::absent("age", ">"))
            .order(OrderSpec::desc("created_at"))
            .limit(10);

        assert_eq!(descriptor.where_.as_ref().map(Vec::len), Some(2));
        assert_eq!(descriptor.limit, Some(10));
        assert!(!descriptor.is_empty());
        assert!(FilterDescriptor::new().is_empty());
    }
}
