//! Shared fixtures: a seeded in-memory store with users, their orders, the
//! orders' items and the users' teams.

#![allow(dead_code)]

pub mod strategies;

use query_scope::repository::{FieldKind, FieldRegistry, Repository};
use query_scope::store::{MemoryStore, RelationDef, Row};
use serde_json::{json, Value};
use std::sync::Arc;

pub const USER_COUNT: u64 = 5;

pub fn seeded_store() -> MemoryStore {
    let store = MemoryStore::new();
    for table in ["users", "orders", "items", "teams"] {
        store.create_table(table, "id");
    }

    store
        .seed(
            "teams",
            vec![json!({"name": "red"}), json!({"name": "blue"})],
        )
        .unwrap();

    store
        .seed(
            "users",
            vec![
                json!({"name": "ann", "status": "active", "age": 34, "team_id": 1,
                       "created_at": "2024-01-05 10:00:00", "active": 1}),
                json!({"name": "bob", "status": "active", "age": 27, "team_id": 2,
                       "created_at": "2024-02-10 09:30:00", "active": 0}),
                json!({"name": "cat", "status": "inactive", "age": 45, "team_id": 1,
                       "created_at": "2024-03-15 12:00:00", "active": "abc"}),
                json!({"name": "dan", "status": "active", "age": null, "team_id": null,
                       "created_at": "2024-03-20 08:00:00", "active": 1}),
                json!({"name": "eve", "status": "pending", "age": 19, "team_id": 2,
                       "created_at": "2023-12-31 23:59:59", "active": 0}),
            ],
        )
        .unwrap();

    // ann has seven orders so per-parent limits are observable
    store
        .seed(
            "orders",
            vec![
                json!({"user_id": 1, "total": 120, "placed_at": "2024-03-01"}),
                json!({"user_id": 1, "total": 50, "placed_at": "2024-03-02"}),
                json!({"user_id": 1, "total": 300, "placed_at": "2024-03-03"}),
                json!({"user_id": 2, "total": 80, "placed_at": "2024-04-01"}),
                json!({"user_id": 3, "total": 15, "placed_at": "2024-04-02"}),
                json!({"user_id": 1, "total": 10, "placed_at": "2024-03-04"}),
                json!({"user_id": 1, "total": 75, "placed_at": "2024-03-05"}),
                json!({"user_id": 1, "total": 60, "placed_at": "2024-03-06"}),
                json!({"user_id": 1, "total": 20, "placed_at": "2024-03-07"}),
            ],
        )
        .unwrap();

    store
        .seed(
            "items",
            vec![
                json!({"order_id": 1, "sku": "A-1", "qty": 2}),
                json!({"order_id": 1, "sku": "B-2", "qty": 1}),
                json!({"order_id": 4, "sku": "C-3", "qty": 5}),
            ],
        )
        .unwrap();

    store
        .define_relation("users", "orders", RelationDef::has_many("orders", "user_id", "id"))
        .unwrap();
    store
        .define_relation("users", "team", RelationDef::belongs_to("teams", "team_id", "id"))
        .unwrap();
    store
        .define_relation("orders", "items", RelationDef::has_many("items", "order_id", "id"))
        .unwrap();
    store
        .define_relation("orders", "user", RelationDef::belongs_to("users", "user_id", "id"))
        .unwrap();

    store
}

pub fn user_fields() -> FieldRegistry {
    FieldRegistry::new()
        .register("active", FieldKind::Any)
        .unwrap()
        .register("status", FieldKind::Text)
        .unwrap()
        .register_nullable("age", FieldKind::Integer)
        .unwrap()
}

pub fn users_repository() -> Repository<MemoryStore> {
    Repository::new(Arc::new(seeded_store()), "users")
        .unwrap()
        .with_fields(user_fields())
}

pub fn orders_repository() -> Repository<MemoryStore> {
    Repository::new(Arc::new(seeded_store()), "orders").unwrap()
}

/// Build a row from a JSON object literal
pub fn row(value: Value) -> Row {
    match value {
        Value::Object(map) => map,
        other => panic!("expected a JSON object, got {other}"),
    }
}

/// Integer ids of materialized rows, in result order
pub fn ids(rows: &[Row]) -> Vec<i64> {
    rows.iter()
        .filter_map(|r| r.get("id").and_then(Value::as_i64))
        .collect()
}

/// Values of one column, in result order
pub fn column(rows: &[Row], name: &str) -> Vec<Value> {
    rows.iter()
        .map(|r| r.get(name).cloned().unwrap_or(Value::Null))
        .collect()
}
