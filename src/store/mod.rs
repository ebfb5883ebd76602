//! # Store Interface
//!
//! The capabilities the repository facade consumes from a relational store.
//! Query-taking operations receive a compiled [`QueryBuilder`]; the store is
//! responsible for executing its joins, groups, ordering, limits and eager
//! loads (applying each [`DeferredFragment`](crate::query_builder::DeferredFragment)
//! once per parent row).
//!
//! [`memory::MemoryStore`] is an in-process implementation over JSON rows.

pub mod eval;
pub mod memory;

use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::query_builder::QueryBuilder;

pub use memory::{MemoryStore, RelationDef, RelationKind};

/// A materialized row, keyed by column name
pub type Row = Map<String, Value>;

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Failures raised by a store; the facade passes them through unchanged
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StoreError {
    #[error("Table not found: {table}")]
    TableNotFound { table: String },

    #[error("Relation `{relation}` is not defined on `{table}`")]
    RelationNotFound { table: String, relation: String },

    #[error("Unsupported operator: {operator}")]
    UnsupportedOperator { operator: String },

    #[error("Constraint violation on `{table}`: {message}")]
    Constraint { table: String, message: String },

    #[error("Store backend error: {message}")]
    Backend { message: String },
}

/// Storage metadata of an entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntityMetadata {
    pub table: String,
    pub primary_key: String,
}

impl EntityMetadata {
    pub fn new(table: impl Into<String>, primary_key: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            primary_key: primary_key.into(),
        }
    }
}

/// One page of results plus the total matching count
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page {
    pub data: Vec<Row>,
    pub total: u64,
    pub per_page: u64,
    pub current_page: u64,
    pub last_page: u64,
}

impl Page {
    /// Whether a later page holds more rows
    pub fn has_more(&self) -> bool {
        self.current_page < self.last_page
    }

    pub fn has_previous(&self) -> bool {
        self.current_page > 1
    }
}

/// Result of a read that may or may not be paginated
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Records {
    All(Vec<Row>),
    Page(Page),
}

impl Records {
    pub fn rows(&self) -> &[Row] {
        match self {
            Records::All(rows) => rows,
            Records::Page(page) => &page.data,
        }
    }

    pub fn into_rows(self) -> Vec<Row> {
        match self {
            Records::All(rows) => rows,
            Records::Page(page) => page.data,
        }
    }

    pub fn page(&self) -> Option<&Page> {
        match self {
            Records::Page(page) => Some(page),
            Records::All(_) => None,
        }
    }
}

/// Relational store capabilities
pub trait Store {
    /// Resolve table name and primary key for an entity
    fn metadata(&self, entity: &str) -> StoreResult<EntityMetadata>;

    /// Materialize every matching row, projected by the query's select list
    fn get(&self, query: &QueryBuilder) -> StoreResult<Vec<Row>>;

    /// Materialize one page; the store resolves the page when `page` is `None`
    fn paginate(&self, query: &QueryBuilder, per_page: u64, page: Option<u64>)
        -> StoreResult<Page>;

    fn first(&self, query: &QueryBuilder) -> StoreResult<Option<Row>>;

    fn count(&self, query: &QueryBuilder) -> StoreResult<u64>;

    /// Keyed lookup within the query's constraints
    fn find(&self, query: &QueryBuilder, id: &Value) -> StoreResult<Option<Row>>;

    /// Single column of the first matching row
    fn value(&self, query: &QueryBuilder, column: &str) -> StoreResult<Option<Value>>;

    /// `key_column` → `value_column` over matching rows
    fn pluck(
        &self,
        query: &QueryBuilder,
        value_column: &str,
        key_column: &str,
    ) -> StoreResult<Map<String, Value>>;

    fn create(&self, table: &str, data: Row) -> StoreResult<Row>;

    fn insert(&self, table: &str, rows: Vec<Row>) -> StoreResult<bool>;

    fn insert_get_id(&self, table: &str, row: Row) -> StoreResult<Value>;

    /// Update matching rows, returning the affected count
    fn update(&self, query: &QueryBuilder, data: &Row) -> StoreResult<u64>;

    /// Upsert keyed on `attributes`
    fn update_or_create(&self, table: &str, attributes: &Row, values: &Row) -> StoreResult<Row>;

    fn delete(&self, query: &QueryBuilder) -> StoreResult<u64>;

    /// Bulk delete by primary key
    fn destroy(&self, table: &str, ids: &[Value]) -> StoreResult<u64>;

    /// Atomically add `amount` to a numeric column of matching rows
    fn increment(&self, query: &QueryBuilder, column: &str, amount: i64) -> StoreResult<u64>;
}
