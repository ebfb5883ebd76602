//! # Scope Conditions
//!
//! One pure function per compiler stage. Each takes the query state and one
//! descriptor fragment and returns the next query state; fragments are
//! already normalized, so no stage can fail.

use tracing::debug;

use crate::filter::{Between, JoinSpec, MembershipFragment, OrderSpec, Predicate};
use crate::query_builder::{Condition, Join, QueryBuilder, WhereClause};

/// Inner-join each quad in descriptor order; duplicates are not detected
pub fn apply_joins(mut query: QueryBuilder, joins: &[JoinSpec]) -> QueryBuilder {
    for spec in joins {
        query = query.join(Join::from(spec));
    }
    query
}

/// Membership filter; fragments that are not exactly two elements are ignored
pub fn apply_where_in(query: QueryBuilder, fragment: &MembershipFragment) -> QueryBuilder {
    match fragment.pair() {
        Some((column, values)) => query.where_in(column, values),
        None => {
            debug!(
                len = fragment.len(),
                "ignoring whereIn fragment without exactly two elements"
            );
            query
        }
    }
}

/// Negated membership filter, same arity rule as [`apply_where_in`]
pub fn apply_where_not_in(query: QueryBuilder, fragment: &MembershipFragment) -> QueryBuilder {
    match fragment.pair() {
        Some((column, values)) => query.where_not_in(column, values),
        None => {
            debug!(
                len = fragment.len(),
                "ignoring whereNotIn fragment without exactly two elements"
            );
            query
        }
    }
}

/// One AND-group of the active predicates
pub fn apply_where(query: QueryBuilder, predicates: &[Predicate]) -> QueryBuilder {
    query.where_clause(WhereClause::and(active_conditions(predicates)))
}

/// One OR-group of the active predicates, AND-ed with everything else
pub fn apply_or_where(query: QueryBuilder, predicates: &[Predicate]) -> QueryBuilder {
    query.where_clause(WhereClause::or(active_conditions(predicates)))
}

pub fn apply_order(query: QueryBuilder, order: &OrderSpec) -> QueryBuilder {
    query.order_by(order.clone())
}

pub fn apply_between(query: QueryBuilder, between: &Between) -> QueryBuilder {
    query.where_between(between)
}

pub fn apply_where_date(query: QueryBuilder, predicate: &Predicate) -> QueryBuilder {
    if !predicate.is_active() {
        debug!(column = %predicate.column, "skipping whereDate predicate with absent value");
        return query;
    }
    query.where_date(&predicate.column, &predicate.operator, predicate.value.clone())
}

pub fn apply_where_month(query: QueryBuilder, predicate: &Predicate) -> QueryBuilder {
    if !predicate.is_active() {
        debug!(column = %predicate.column, "skipping whereMonth predicate with absent value");
        return query;
    }
    query.where_month(&predicate.column, &predicate.operator, predicate.value.clone())
}

/// Zero means no cap
pub fn apply_limit(query: QueryBuilder, limit: u64) -> QueryBuilder {
    if limit == 0 {
        return query;
    }
    query.limit(limit)
}

/// Null-skip: predicates whose value is absent never reach the store
fn active_conditions(predicates: &[Predicate]) -> Vec<Condition> {
    predicates
        .iter()
        .filter(|p| {
            if !p.is_active() {
                debug!(
                    column = %p.column,
                    operator = %p.operator,
                    "skipping predicate with absent value"
                );
            }
            p.is_active()
        })
        .map(Condition::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn users() -> QueryBuilder {
        QueryBuilder::new("users")
    }

    #[test]
    fn test_where_drops_absent_predicates() {
        let query = apply_where(
            users(),
            &[
                Predicate::eq("status", json!("active")),
                Predicate::absent("age", ">"),
            ],
        );
        assert_eq!(query.build_sql(), "SELECT * FROM users WHERE status = 'active'");
    }

    #[test]
    fn test_where_with_only_absent_predicates_is_always_true() {
        let query = apply_where(users(), &[Predicate::absent("age", ">")]);
        assert_eq!(query.build_sql(), "SELECT * FROM users WHERE 1=1");
    }

    #[test]
    fn test_or_where_is_nested_group() {
        let query = apply_where(users(), &[Predicate::eq("active", json!(true))]);
        let query = apply_or_where(
            query,
            &[
                Predicate::eq("role", json!("admin")),
                Predicate::absent("team", "="),
                Predicate::eq("role", json!("owner")),
            ],
        );
        assert_eq!(
            query.build_sql(),
            "SELECT * FROM users WHERE active = true AND (role = 'admin' OR role = 'owner')"
        );
    }

    #[test]
    fn test_where_in_wrong_arity_is_identity() {
        let fragment =
            MembershipFragment::from_items("whereIn", vec![json!("id"), json!(1), json!(2)])
                .unwrap();
        assert_eq!(apply_where_in(users(), &fragment), users());
        assert_eq!(apply_where_not_in(users(), &fragment), users());
    }

    #[test]
    fn test_where_in_scalar_becomes_singleton() {
        let query = apply_where_in(users(), &MembershipFragment::new("id", json!(4)));
        assert_eq!(query.build_sql(), "SELECT * FROM users WHERE id IN (4)");

        let query = apply_where_not_in(users(), &MembershipFragment::new("id", json!([1, 2])));
        assert_eq!(query.build_sql(), "SELECT * FROM users WHERE id NOT IN (1, 2)");
    }

    #[test]
    fn test_date_parts_null_skip() {
        let query = apply_where_date(users(), &Predicate::absent("created_at", ">="));
        assert_eq!(query, users());

        let query = apply_where_month(users(), &Predicate::new("created_at", "=", json!(3)));
        assert_eq!(query.build_sql(), "SELECT * FROM users WHERE MONTH(created_at) = 3");
    }

    #[test]
    fn test_joins_in_order() {
        let query = apply_joins(
            users(),
            &[
                JoinSpec::new("profiles", "profiles.user_id", "=", "users.id"),
                JoinSpec::new("teams", "teams.id", "=", "profiles.team_id"),
            ],
        );
        assert_eq!(
            query.build_sql(),
            "SELECT * FROM users INNER JOIN profiles ON profiles.user_id = users.id \
             INNER JOIN teams ON teams.id = profiles.team_id"
        );
    }

    #[test]
    fn test_between_and_limit() {
        let query = apply_between(users(), &Between::new("age", json!(18), json!(30)));
        let query = apply_limit(query, 0);
        let query = apply_limit(query, 25);
        assert_eq!(
            query.build_sql(),
            "SELECT * FROM users WHERE age BETWEEN 18 AND 30 LIMIT 25"
        );
    }
}
