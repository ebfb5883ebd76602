//! # Repository
//!
//! The facade application code calls: descriptor-driven and flat-filter
//! reads, keyed lookups, and mutation passthroughs over a [`Store`](crate::store::Store).
//!
//! ```rust
//! use query_scope::filter::FilterDescriptor;
//! use query_scope::repository::Repository;
//! use query_scope::store::MemoryStore;
//! use serde_json::json;
//! use std::sync::Arc;
//!
//! let store = MemoryStore::new();
//! store.create_table("users", "id");
//! store
//!     .seed("users", vec![json!({"name": "ann", "status": "active"})])
//!     .unwrap();
//!
//! let users = Repository::new(Arc::new(store), "users").unwrap();
//! let descriptor = FilterDescriptor::from_json(&json!({
//!     "where": [["status", "=", "active"]]
//! })).unwrap();
//!
//! let records = users.get_all_record(&descriptor, &["name"], None).unwrap();
//! assert_eq!(records.rows().len(), 1);
//! ```

pub mod base;
pub mod fields;

pub use base::Repository;
pub use fields::{FieldAccessor, FieldKind, FieldRegistry};
