//! # Relation Eager-Loader
//!
//! Turns each [`RelationSpec`] into an [`EagerLoad`] whose nested scoping is a
//! [`DeferredFragment`] value. The store applies the fragment per parent row
//! at materialization time.
//!
//! Relation conditions are attached verbatim: unlike top-level `where`, a
//! condition whose value is absent is still applied.
//!
//! Dot-qualified names (`orders.items`) are forwarded unchanged; the fragment
//! scopes the last segment only. Per-level scoping of intermediate segments is
//! not supported.

use tracing::debug;

use crate::filter::RelationSpec;
use crate::query_builder::{DeferredFragment, EagerLoad, QueryBuilder};

pub fn apply_relations(mut query: QueryBuilder, relations: &[RelationSpec]) -> QueryBuilder {
    for spec in relations {
        debug!(
            relation = %spec.name,
            conditions = spec.conditions.len(),
            limit = ?spec.limit,
            "registering eager load"
        );
        query = query.with(EagerLoad::new(spec.name.clone(), deferred_fragment(spec)));
    }
    query
}

fn deferred_fragment(spec: &RelationSpec) -> DeferredFragment {
    DeferredFragment {
        conditions: spec.conditions.clone(),
        fields: spec.fields.clone(),
        order: spec.order.clone(),
        limit: spec.limit.filter(|limit| *limit > 0),
    }
}
