//! # Eager Loads
//!
//! A relation-load request carries a [`DeferredFragment`]: the nested query
//! description the store applies once per matched parent row when it
//! materializes related rows. Nothing here runs at compile time.

use super::builder::QueryBuilder;
use super::conditions::{Condition, WhereClause};
use crate::filter::{OrderSpec, Predicate};

/// Described-but-not-yet-executed scoping of a related-row query
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DeferredFragment {
    /// AND-composed verbatim, including predicates whose value is absent
    pub conditions: Vec<Predicate>,
    pub fields: Option<Vec<String>>,
    pub order: Option<OrderSpec>,
    /// Cap on related rows per parent
    pub limit: Option<u64>,
}

impl DeferredFragment {
    pub fn is_unconstrained(&self) -> bool {
        self == &Self::default()
    }

    /// Scope a related-row query for one parent
    pub fn apply(&self, mut query: QueryBuilder) -> QueryBuilder {
        if !self.conditions.is_empty() {
            query = query.where_clause(WhereClause::and(
                self.conditions.iter().map(Condition::from).collect(),
            ));
        }
        if let Some(ref fields) = self.fields {
            query = query.select(fields);
        }
        if let Some(ref order) = self.order {
            query = query.order_by(order.clone());
        }
        if let Some(limit) = self.limit {
            query = query.limit(limit);
        }
        query
    }
}

/// Named eager-load request; `relation` may be a dot-qualified path
#[derive(Debug, Clone, PartialEq)]
pub struct EagerLoad {
    pub relation: String,
    pub fragment: DeferredFragment,
}

impl EagerLoad {
    pub fn new(relation: impl Into<String>, fragment: DeferredFragment) -> Self {
        Self {
            relation: relation.into(),
            fragment,
        }
    }

    /// Path segments, outermost relation first
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.relation.split('.')
    }

    /// Whether the path reaches through another relation
    pub fn is_nested(&self) -> bool {
        self.relation.contains('.')
    }
}
