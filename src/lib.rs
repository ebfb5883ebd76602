#![allow(clippy::doc_markdown)] // Allow technical terms like orWhere, whereIn in docs
#![allow(clippy::missing_errors_doc)] // Allow public functions without # Errors sections
#![allow(clippy::must_use_candidate)] // Allow methods without must_use when context is clear

//! # Query Scope
//!
//! Relational query composition expressed as data. A [`FilterDescriptor`]
//! describes which predicates, joins, ranges, date-part filters, ordering,
//! limits and relation eager-loads to apply; the [`FilterCompiler`] folds it
//! onto a [`QueryBuilder`] through a fixed pipeline of independently optional
//! stages, and the [`Repository`] facade runs compiled queries against a
//! [`Store`].
//!
//! ## Module Organization
//!
//! - [`filter`] - Predicate model and descriptor ingestion
//! - [`query_builder`] - Query-state value, conditions, joins, pagination, eager loads
//! - [`scopes`] - The compiler stages and pipelines
//! - [`store`] - Store capability trait and the in-memory store
//! - [`repository`] - Per-entity facade
//! - [`config`] - Configuration management
//! - [`error`] - Structured error handling
//! - [`logging`] - Structured logging setup
//!
//! ## Null-skip
//!
//! Top-level `where`, `orWhere`, `whereDate` and `whereMonth` predicates whose
//! value is `null` are dropped before they reach the store. Relation
//! `condition` predicates are applied as written, `null` included.
//!
//! ## Quick Start
//!
//! ```rust
//! use query_scope::{FilterDescriptor, MemoryStore, RelationDef, Repository};
//! use serde_json::json;
//! use std::sync::Arc;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let store = MemoryStore::new();
//! store.create_table("users", "id");
//! store.create_table("orders", "id");
//! store.define_relation("users", "orders", RelationDef::has_many("orders", "user_id", "id"))?;
//! store.seed("users", vec![json!({"name": "ann", "status": "active"})])?;
//! store.seed("orders", vec![json!({"user_id": 1, "total": 40})])?;
//!
//! let users = Repository::new(Arc::new(store), "users")?;
//! let descriptor = FilterDescriptor::from_json(&json!({
//!     "relation": [{"name": "orders", "field": "id,user_id,total", "limit": 5}],
//!     "where": [["status", "=", "active"]],
//!     "order": "name,asc"
//! }))?;
//!
//! let rows = users.get_all_record(&descriptor, &[], None)?.into_rows();
//! assert_eq!(rows[0]["orders"][0]["total"], json!(40));
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod filter;
pub mod logging;
pub mod query_builder;
pub mod repository;
pub mod scopes;
pub mod store;

pub use config::{ConfigManager, QueryScopeConfig};
pub use error::{QueryScopeError, Result};
pub use filter::{
    Between, FilterDescriptor, JoinSpec, MembershipFragment, OrderSpec, Predicate, RelationSpec,
    SortDirection,
};
pub use query_builder::{DeferredFragment, EagerLoad, QueryBuilder};
pub use repository::{FieldKind, FieldRegistry, Repository};
pub use scopes::{FilterCompiler, Stage};
pub use store::{
    EntityMetadata, MemoryStore, Page, Records, RelationDef, RelationKind, Row, Store, StoreError,
};
