//! # Filter Compiler
//!
//! Compiles a [`FilterDescriptor`] onto a [`QueryBuilder`] through a fixed,
//! ordered list of independently optional stages. A stage whose fragment key
//! is absent is the identity transform, and no stage depends on a later one
//! having run, so any prefix of the pipeline yields a subset of the full
//! pipeline's constraints.
//!
//! ## Stage order
//!
//! 1. relations (eager loads with deferred fragments)
//! 2. joins
//! 3. whereIn
//! 4. whereNotIn
//! 5. where (AND-group, null-skip)
//! 6. orWhere (OR-group, null-skip)
//! 7. order
//! 8. between
//! 9. whereDate (null-skip)
//! 10. whereMonth (null-skip)
//! 11. limit
//!
//! ```rust
//! use query_scope::filter::FilterDescriptor;
//! use query_scope::query_builder::QueryBuilder;
//! use query_scope::scopes::FilterCompiler;
//! use serde_json::json;
//!
//! let descriptor = FilterDescriptor::from_json(&json!({
//!     "where": [["status", "=", "active"], ["age", ">", null]],
//!     "order": ["created_at", "desc"],
//!     "limit": 10
//! })).unwrap();
//!
//! let query = FilterCompiler::compile(QueryBuilder::new("users"), &descriptor);
//! assert_eq!(
//!     query.build_sql(),
//!     "SELECT * FROM users WHERE status = 'active' ORDER BY created_at DESC LIMIT 10"
//! );
//! ```

pub mod condition;
pub mod relation;
pub mod repository;

use tracing::debug;

use crate::filter::FilterDescriptor;
use crate::query_builder::QueryBuilder;

pub use repository::{scope_filter, scope_sort};

/// Compiler stages in their fixed application order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Relations,
    Joins,
    WhereIn,
    WhereNotIn,
    Where,
    OrWhere,
    Order,
    Between,
    WhereDate,
    WhereMonth,
    Limit,
}

impl Stage {
    pub const PIPELINE: [Stage; 11] = [
        Stage::Relations,
        Stage::Joins,
        Stage::WhereIn,
        Stage::WhereNotIn,
        Stage::Where,
        Stage::OrWhere,
        Stage::Order,
        Stage::Between,
        Stage::WhereDate,
        Stage::WhereMonth,
        Stage::Limit,
    ];

    /// Stages run by `first`
    pub const FIRST: [Stage; 3] = [Stage::Relations, Stage::Where, Stage::Order];

    /// Stages run before a keyed lookup
    pub const KEYED: [Stage; 2] = [Stage::Relations, Stage::Where];
}

/// Stateless compiler over filter descriptors
pub struct FilterCompiler;

impl FilterCompiler {
    /// Run the full pipeline
    pub fn compile(query: QueryBuilder, descriptor: &FilterDescriptor) -> QueryBuilder {
        Self::compile_stages(query, descriptor, &Stage::PIPELINE)
    }

    /// Run only the given stages, always in pipeline order
    pub fn compile_stages(
        query: QueryBuilder,
        descriptor: &FilterDescriptor,
        stages: &[Stage],
    ) -> QueryBuilder {
        let compiled = Stage::PIPELINE
            .iter()
            .filter(|stage| stages.contains(stage))
            .fold(query, |query, stage| {
                Self::apply_stage(query, descriptor, *stage)
            });

        debug!(
            table = compiled.table(),
            stages = stages.len(),
            groups = compiled.where_clauses().len(),
            eager_loads = compiled.eager_loads().len(),
            "compiled filter descriptor"
        );
        compiled
    }

    /// Apply one stage; an absent or empty fragment is the identity
    pub fn apply_stage(
        query: QueryBuilder,
        descriptor: &FilterDescriptor,
        stage: Stage,
    ) -> QueryBuilder {
        match stage {
            Stage::Relations => match descriptor.relation.as_deref() {
                Some(relations) if !relations.is_empty() => {
                    relation::apply_relations(query, relations)
                }
                _ => query,
            },
            Stage::Joins => match descriptor.join.as_deref() {
                Some(joins) if !joins.is_empty() => condition::apply_joins(query, joins),
                _ => query,
            },
            Stage::WhereIn => match descriptor.where_in {
                Some(ref fragment) => condition::apply_where_in(query, fragment),
                None => query,
            },
            Stage::WhereNotIn => match descriptor.where_not_in {
                Some(ref fragment) => condition::apply_where_not_in(query, fragment),
                None => query,
            },
            Stage::Where => match descriptor.where_.as_deref() {
                Some(predicates) if !predicates.is_empty() => {
                    condition::apply_where(query, predicates)
                }
                _ => query,
            },
            Stage::OrWhere => match descriptor.or_where.as_deref() {
                Some(predicates) if !predicates.is_empty() => {
                    condition::apply_or_where(query, predicates)
                }
                _ => query,
            },
            Stage::Order => match descriptor.order {
                Some(ref order) => condition::apply_order(query, order),
                None => query,
            },
            Stage::Between => match descriptor.between {
                Some(ref between) => condition::apply_between(query, between),
                None => query,
            },
            Stage::WhereDate => match descriptor.where_date {
                Some(ref predicate) => condition::apply_where_date(query, predicate),
                None => query,
            },
            Stage::WhereMonth => match descriptor.where_month {
                Some(ref predicate) => condition::apply_where_month(query, predicate),
                None => query,
            },
            Stage::Limit => match descriptor.limit {
                Some(limit) => condition::apply_limit(query, limit),
                None => query,
            },
        }
    }
}
