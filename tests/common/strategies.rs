use proptest::prelude::*;
use proptest::strategy::Just;
use query_scope::filter::{Between, FilterDescriptor, MembershipFragment, OrderSpec, Predicate};
use serde_json::{json, Value};

/// Numeric columns of the fixture `users` table
pub fn numeric_column_strategy() -> impl Strategy<Value = &'static str> {
    prop_oneof![Just("id"), Just("age"), Just("team_id")]
}

pub fn comparison_operator_strategy() -> impl Strategy<Value = &'static str> {
    prop_oneof![
        Just("="),
        Just("!="),
        Just(">"),
        Just(">="),
        Just("<"),
        Just("<="),
    ]
}

/// Active predicate over a numeric column
pub fn predicate_strategy() -> impl Strategy<Value = Predicate> {
    (numeric_column_strategy(), comparison_operator_strategy(), 0i64..50)
        .prop_map(|(column, operator, value)| Predicate::new(column, operator, json!(value)))
}

/// Predicate carrying the absent marker
pub fn absent_predicate_strategy() -> impl Strategy<Value = Predicate> {
    (numeric_column_strategy(), comparison_operator_strategy())
        .prop_map(|(column, operator)| Predicate::absent(column, operator))
}

pub fn order_strategy() -> impl Strategy<Value = OrderSpec> {
    (
        prop_oneof![Just("id"), Just("age"), Just("name"), Just("created_at")],
        any::<bool>(),
    )
        .prop_map(|(column, ascending)| {
            if ascending {
                OrderSpec::asc(column)
            } else {
                OrderSpec::desc(column)
            }
        })
}

/// Date-part predicate against the fixture's `created_at` column
pub fn date_predicate_strategy() -> impl Strategy<Value = Predicate> {
    (
        prop_oneof![Just(">="), Just("<="), Just("=")],
        prop_oneof![
            Just("2024-01-05"),
            Just("2024-02-01"),
            Just("2024-03-15"),
            Just("2023-12-31"),
        ],
    )
        .prop_map(|(operator, date)| Predicate::new("created_at", operator, json!(date)))
}

/// Membership fragment of arbitrary arity, including the ignored shapes
pub fn membership_items_strategy() -> impl Strategy<Value = Vec<Value>> {
    prop::collection::vec(
        prop_oneof![
            Just(json!("id")),
            (0i64..6).prop_map(|v| json!(v)),
            prop::collection::vec((0i64..6).prop_map(|v| json!(v)), 0..4).prop_map(Value::from),
        ],
        0..5,
    )
}

/// Descriptor over the fixture `users` table with any subset of the
/// row-narrowing fragments populated
pub fn descriptor_strategy() -> impl Strategy<Value = FilterDescriptor> {
    (
        prop::option::of(prop::collection::vec(predicate_strategy(), 1..3)),
        prop::option::of(prop::collection::vec(predicate_strategy(), 1..3)),
        prop::option::of(prop::collection::vec(1i64..6, 0..4)),
        prop::option::of(prop::collection::vec(1i64..6, 0..3)),
        prop::option::of((0i64..50, 0i64..50)),
        prop::option::of(date_predicate_strategy()),
        prop::option::of(order_strategy()),
        prop::option::of(1u64..6),
    )
        .prop_map(
            |(where_, or_where, where_in, where_not_in, between, where_date, order, limit)| {
                FilterDescriptor {
                    where_in: where_in
                        .map(|ids| MembershipFragment::new("id", Value::from(ids))),
                    where_not_in: where_not_in
                        .map(|ids| MembershipFragment::new("id", Value::from(ids))),
                    where_,
                    or_where,
                    between: between
                        .map(|(lo, hi)| Between::new("age", json!(lo.min(hi)), json!(lo.max(hi)))),
                    where_date,
                    order,
                    limit,
                    ..Default::default()
                }
            },
        )
}
