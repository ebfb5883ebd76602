//! Reduced scopes used by the simple repository read paths.

use crate::filter::{OrderSpec, Predicate};
use crate::query_builder::QueryBuilder;

use super::condition::apply_where;

/// Flat AND filter; an empty list leaves the query unconstrained.
///
/// Shares the `where` stage's null-skip, so it never constrains more than
/// the full pipeline would for the same predicates.
pub fn scope_filter(query: QueryBuilder, filter: &[Predicate]) -> QueryBuilder {
    if filter.is_empty() {
        return query;
    }
    apply_where(query, filter)
}

/// Multi-column ordering applied in list order
pub fn scope_sort(mut query: QueryBuilder, sorts: &[OrderSpec]) -> QueryBuilder {
    for sort in sorts {
        query = query.order_by(sort.clone());
    }
    query
}
