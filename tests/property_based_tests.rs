mod common;

use common::strategies::*;
use common::{ids, seeded_store};
use proptest::prelude::*;
use query_scope::filter::{MembershipFragment, Predicate};
use query_scope::query_builder::QueryBuilder;
use query_scope::scopes::{FilterCompiler, Stage};
use query_scope::store::{MemoryStore, Store};
use std::collections::BTreeSet;

fn result_ids(store: &MemoryStore, query: &QueryBuilder) -> Vec<i64> {
    ids(&store.get(query).unwrap())
}

proptest! {
    /// Property: running more of the pipeline never widens the result set
    #[test]
    fn pipeline_prefixes_narrow_monotonically(
        descriptor in descriptor_strategy(),
        cut in 0usize..=Stage::PIPELINE.len(),
    ) {
        let store = seeded_store();
        let prefix = FilterCompiler::compile_stages(
            QueryBuilder::new("users"),
            &descriptor,
            &Stage::PIPELINE[..cut],
        );
        let full = FilterCompiler::compile(QueryBuilder::new("users"), &descriptor);

        let prefix_ids: BTreeSet<i64> = result_ids(&store, &prefix).into_iter().collect();
        let full_ids: BTreeSet<i64> = result_ids(&store, &full).into_iter().collect();
        prop_assert!(
            full_ids.is_subset(&prefix_ids),
            "full pipeline {:?} is not within prefix {:?} ({} stages)",
            full_ids,
            prefix_ids,
            cut
        );
    }

    /// Property: absent-valued top-level predicates never change the result
    #[test]
    fn absent_predicates_are_skipped(
        descriptor in descriptor_strategy(),
        absent in prop::collection::vec(absent_predicate_strategy(), 1..3),
        absent_date in any::<bool>(),
    ) {
        let store = seeded_store();
        let mut padded = descriptor.clone();
        padded.where_.get_or_insert_with(Vec::new).extend(absent.iter().cloned());
        padded.or_where.get_or_insert_with(Vec::new).extend(absent.iter().cloned());
        if absent_date {
            padded.where_date.get_or_insert_with(|| Predicate::absent("created_at", ">="));
            padded.where_month = Some(Predicate::absent("created_at", "="));
        }

        let expected = FilterCompiler::compile(QueryBuilder::new("users"), &descriptor);
        let actual = FilterCompiler::compile(QueryBuilder::new("users"), &padded);
        let expected = result_ids(&store, &expected);
        let actual = result_ids(&store, &actual);
        prop_assert_eq!(actual, expected);
    }

    /// Property: membership fragments that are not pairs compile to nothing
    #[test]
    fn wrong_arity_membership_is_ignored(
        descriptor in descriptor_strategy(),
        items in membership_items_strategy(),
    ) {
        prop_assume!(items.len() != 2);
        let fragment = MembershipFragment::from_items("whereIn", items).unwrap();

        let mut omitted = descriptor;
        omitted.where_in = None;
        omitted.where_not_in = None;
        let mut with_in = omitted.clone();
        with_in.where_in = Some(fragment.clone());
        let mut with_not_in = omitted.clone();
        with_not_in.where_not_in = Some(fragment);

        let baseline = FilterCompiler::compile(QueryBuilder::new("users"), &omitted);
        let compiled_in = FilterCompiler::compile(QueryBuilder::new("users"), &with_in);
        let compiled_not_in = FilterCompiler::compile(QueryBuilder::new("users"), &with_not_in);
        prop_assert_eq!(&compiled_in, &baseline);
        prop_assert_eq!(&compiled_not_in, &baseline);
    }

    /// Property: the flat filter never constrains more than the where stage
    #[test]
    fn flat_filter_matches_where_stage(
        filter in prop::collection::vec(
            prop_oneof![predicate_strategy(), absent_predicate_strategy()],
            0..4,
        ),
    ) {
        let store = seeded_store();
        let flat = query_scope::scopes::scope_filter(QueryBuilder::new("users"), &filter);
        let staged = FilterCompiler::compile_stages(
            QueryBuilder::new("users"),
            &query_scope::filter::FilterDescriptor {
                where_: Some(filter.clone()),
                ..Default::default()
            },
            &[Stage::Where],
        );
        prop_assert_eq!(result_ids(&store, &flat), result_ids(&store, &staged));
    }
}

#[cfg(test)]
mod stage_invariants {
    use super::*;

    #[test]
    fn test_reduced_pipelines_are_ordered_subsets() {
        for reduced in [&Stage::FIRST[..], &Stage::KEYED[..]] {
            let positions: Vec<usize> = reduced
                .iter()
                .map(|stage| Stage::PIPELINE.iter().position(|s| s == stage).unwrap())
                .collect();
            assert!(positions.windows(2).all(|w| w[0] < w[1]));
        }
    }
}
