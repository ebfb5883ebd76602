use query_scope::filter::JoinSpec;
use query_scope::query_builder::joins::{Join, JoinType};

#[test]
fn test_inner_join() {
    let join = Join::inner("users", "users.id", "=", "posts.user_id");
    assert_eq!(join.to_sql(), "INNER JOIN users ON users.id = posts.user_id");
}

#[test]
fn test_left_join() {
    let join = Join::left("profiles", "profiles.user_id", "=", "users.id");
    assert_eq!(join.join_type, JoinType::Left);
    assert_eq!(
        join.to_sql(),
        "LEFT JOIN profiles ON profiles.user_id = users.id"
    );
}

#[test]
fn test_descriptor_join_is_inner() {
    let spec = JoinSpec::new("teams", "teams.id", "=", "users.team_id");
    let join = Join::from(&spec);
    assert_eq!(join.join_type, JoinType::Inner);
    assert_eq!(join.to_sql(), "INNER JOIN teams ON teams.id = users.team_id");
}
