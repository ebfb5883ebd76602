use query_scope::query_builder::conditions::*;
use serde_json::json;

#[test]
fn test_simple_condition() {
    let condition = Condition::Simple {
        field: "name".to_string(),
        operator: "=".to_string(),
        value: serde_json::Value::String("test".to_string()),
    };
    assert_eq!(condition.to_sql(), "name = 'test'");
}

#[test]
fn test_in_condition() {
    let condition = Condition::In {
        field: "id".to_string(),
        values: vec![json!(1), json!(2), json!(3)],
    };
    assert_eq!(condition.to_sql(), "id IN (1, 2, 3)");
}

#[test]
fn test_not_in_condition() {
    let condition = Condition::NotIn {
        field: "state".to_string(),
        values: vec![json!("closed")],
    };
    assert_eq!(condition.to_sql(), "state NOT IN ('closed')");
}

#[test]
fn test_date_condition() {
    let condition = Condition::Date {
        field: "created_at".to_string(),
        operator: ">=".to_string(),
        value: json!("2024-01-01"),
    };
    assert_eq!(condition.to_sql(), "DATE(created_at) >= '2024-01-01'");
}

#[test]
fn test_where_clause_grouping() {
    let group = WhereClause::or(vec![
        Condition::Simple {
            field: "role".to_string(),
            operator: "=".to_string(),
            value: json!("admin"),
        },
        Condition::Simple {
            field: "role".to_string(),
            operator: "=".to_string(),
            value: json!("owner"),
        },
    ]);
    assert_eq!(group.to_sql(), "(role = 'admin' OR role = 'owner')");
    assert_eq!(WhereClause::and(Vec::new()).to_sql(), "1=1");
}
