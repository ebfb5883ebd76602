use query_scope::filter::{Between, OrderSpec};
use query_scope::query_builder::{DeferredFragment, EagerLoad, Join, QueryBuilder};
use serde_json::json;

#[test]
fn test_basic_query_building() {
    let query = QueryBuilder::new("users")
        .select(["id", "name", "status"])
        .where_eq("status", json!("active"))
        .order_by(OrderSpec::desc("created_at"))
        .limit(10);

    let sql = query.build_sql();
    assert!(sql.contains("SELECT id, name, status"));
    assert!(sql.contains("FROM users"));
    assert!(sql.contains("WHERE status = 'active'"));
    assert!(sql.contains("ORDER BY created_at DESC"));
    assert!(sql.contains("LIMIT 10"));
}

#[test]
fn test_join_query_building() {
    let query = QueryBuilder::new("users")
        .inner_join("orders", "orders.user_id", "=", "users.id")
        .join(Join::left("profiles", "profiles.user_id", "=", "users.id"))
        .where_eq("orders.state", json!("paid"));

    let sql = query.build_sql();
    assert!(sql.contains("INNER JOIN orders ON orders.user_id = users.id"));
    assert!(sql.contains("LEFT JOIN profiles ON profiles.user_id = users.id"));
    assert!(sql.ends_with("WHERE orders.state = 'paid'"));
}

#[test]
fn test_groups_are_anded() {
    let query = QueryBuilder::new("events")
        .where_in("kind", vec![json!("a"), json!("b")])
        .where_between(&Between::new("day", json!(1), json!(7)))
        .where_month("created_at", "=", json!(3));

    assert_eq!(
        query.build_sql(),
        "SELECT * FROM events WHERE kind IN ('a', 'b') AND day BETWEEN 1 AND 7 AND MONTH(created_at) = 3"
    );
}

#[test]
fn test_eager_loads_do_not_render() {
    let query = QueryBuilder::new("users").with(EagerLoad::new(
        "orders",
        DeferredFragment {
            limit: Some(5),
            ..Default::default()
        },
    ));

    assert_eq!(query.build_sql(), "SELECT * FROM users");
    assert_eq!(query.eager_loads().len(), 1);
}

#[test]
fn test_count_query() {
    let query = QueryBuilder::new("users")
        .where_eq("status", json!("active"))
        .order_by(OrderSpec::asc("name"))
        .paginate(3, 10);

    assert_eq!(
        query.for_count().build_sql(),
        "SELECT COUNT(*) FROM users WHERE status = 'active'"
    );
}
