//! # Repository Facade
//!
//! Per-entity entry points over a [`Store`]. Read paths pick a pipeline
//! strength: the flat AND filter ([`scope_filter`]) for the simple calls,
//! the full [`FilterCompiler`] for descriptor-driven calls. Mutations are
//! forwarded to the store.

use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::{debug, info};

use super::fields::FieldRegistry;
use crate::config::{PaginationConfig, QueryScopeConfig};
use crate::error::{QueryScopeError, Result};
use crate::filter::parse::is_truthy;
use crate::filter::{FilterDescriptor, OrderSpec, Predicate};
use crate::query_builder::QueryBuilder;
use crate::scopes::{scope_filter, scope_sort, FilterCompiler, Stage};
use crate::store::{EntityMetadata, Page, Records, Row, Store};

/// Repository for one entity of a store
pub struct Repository<S: Store> {
    store: Arc<S>,
    metadata: EntityMetadata,
    fields: FieldRegistry,
    pagination: PaginationConfig,
}

impl<S: Store> Repository<S> {
    /// Bind to an entity, resolving its table and primary key from the store
    pub fn new(store: Arc<S>, entity: &str) -> Result<Self> {
        let metadata = store.metadata(entity)?;
        debug!(
            table = %metadata.table,
            primary_key = %metadata.primary_key,
            "repository bound"
        );
        Ok(Self {
            store,
            metadata,
            fields: FieldRegistry::default(),
            pagination: PaginationConfig::default(),
        })
    }

    pub fn with_config(mut self, config: &QueryScopeConfig) -> Self {
        self.pagination = config.pagination;
        self
    }

    /// Fields writable through [`Self::update_by_field`]
    pub fn with_fields(mut self, fields: FieldRegistry) -> Self {
        self.fields = fields;
        self
    }

    pub fn metadata(&self) -> &EntityMetadata {
        &self.metadata
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn fields(&self) -> &FieldRegistry {
        &self.fields
    }

    fn query(&self) -> QueryBuilder {
        QueryBuilder::new(&self.metadata.table)
    }

    fn by_key(&self, id: &Value) -> QueryBuilder {
        self.query().where_eq(&self.metadata.primary_key, id.clone())
    }

    fn missing(&self, id: &Value) -> QueryScopeError {
        QueryScopeError::not_found(&self.metadata.table, id.clone())
    }

    // ----- flat-filter reads -------------------------------------------------

    /// Flat AND filter, then sorts, then either every row or one page
    pub fn get_all(
        &self,
        filter: &[Predicate],
        sorts: &[OrderSpec],
        per_page: Option<u64>,
        columns: &[&str],
    ) -> Result<Records> {
        let query = scope_sort(scope_filter(self.query(), filter), sorts).select(columns);

        match per_page.filter(|n| *n > 0) {
            Some(per_page) => Ok(Records::Page(self.store.paginate(&query, per_page, None)?)),
            None => Ok(Records::All(self.store.get(&query)?)),
        }
    }

    /// First row matching a flat filter; an empty filter returns `None`
    /// without querying
    pub fn find_by(&self, filter: &[Predicate], columns: &[&str]) -> Result<Option<Row>> {
        if filter.is_empty() {
            return Ok(None);
        }
        let query = scope_filter(self.query(), filter).select(columns);
        Ok(self.store.first(&query)?)
    }

    /// Number of rows matching a flat filter; an empty filter counts everything
    pub fn count_by(&self, filter: &[Predicate]) -> Result<u64> {
        Ok(self.store.count(&scope_filter(self.query(), filter))?)
    }

    // ----- full-pipeline reads -----------------------------------------------

    /// Compile the whole descriptor, then materialize all rows or one page
    pub fn get_all_record(
        &self,
        descriptor: &FilterDescriptor,
        columns: &[&str],
        paginate: Option<u64>,
    ) -> Result<Records> {
        let query = FilterCompiler::compile(self.query(), descriptor).select(columns);

        match paginate.filter(|n| *n > 0) {
            Some(per_page) => Ok(Records::Page(self.store.paginate(&query, per_page, None)?)),
            None => Ok(Records::All(self.store.get(&query)?)),
        }
    }

    /// [`Self::get_all_record`] paginated with the configured page size
    pub fn paginate_default(
        &self,
        descriptor: &FilterDescriptor,
        columns: &[&str],
    ) -> Result<Page> {
        let query = FilterCompiler::compile(self.query(), descriptor).select(columns);
        Ok(self
            .store
            .paginate(&query, self.pagination.default_per_page, None)?)
    }

    /// Relations, where and order stages, then the first row
    pub fn first(&self, descriptor: &FilterDescriptor, columns: &[&str]) -> Result<Option<Row>> {
        let query =
            FilterCompiler::compile_stages(self.query(), descriptor, &Stage::FIRST).select(columns);
        Ok(self.store.first(&query)?)
    }

    /// Relations and where stages, then a keyed lookup that fails on miss
    pub fn find_one_by_id(
        &self,
        id: &Value,
        descriptor: &FilterDescriptor,
        columns: &[&str],
    ) -> Result<Row> {
        let query =
            FilterCompiler::compile_stages(self.query(), descriptor, &Stage::KEYED).select(columns);
        self.store
            .find(&query, id)?
            .ok_or_else(|| self.missing(id))
    }

    // ----- keyed reads -------------------------------------------------------

    /// Keyed lookup; `None` on miss
    pub fn find(&self, id: &Value) -> Result<Option<Row>> {
        Ok(self.store.find(&self.query(), id)?)
    }

    /// Keyed lookup; [`QueryScopeError::NotFound`] on miss
    pub fn find_by_id(&self, id: &Value, columns: &[&str]) -> Result<Row> {
        self.store
            .find(&self.query().select(columns), id)?
            .ok_or_else(|| self.missing(id))
    }

    pub fn first_by_id(&self, id: &Value, columns: &[&str]) -> Result<Option<Row>> {
        Ok(self.store.first(&self.by_key(id).select(columns))?)
    }

    pub fn value_by_id(&self, id: &Value, column: &str) -> Result<Option<Value>> {
        Ok(self.store.value(&self.by_key(id), column)?)
    }

    /// `key_column` → `value_column` over every row
    pub fn get_pluck(&self, value_column: &str, key_column: &str) -> Result<Map<String, Value>> {
        Ok(self.store.pluck(&self.query(), value_column, key_column)?)
    }

    // ----- mutations ---------------------------------------------------------

    pub fn create(&self, data: Row) -> Result<Row> {
        let row = self.store.create(&self.metadata.table, data)?;
        let id = row.get(&self.metadata.primary_key).cloned().unwrap_or_default();
        info!(
            table = %self.metadata.table,
            id = %id,
            "created record"
        );
        Ok(row)
    }

    pub fn insert(&self, rows: Vec<Row>) -> Result<bool> {
        let count = rows.len();
        let inserted = self.store.insert(&self.metadata.table, rows)?;
        info!(table = %self.metadata.table, count, "inserted records");
        Ok(inserted)
    }

    pub fn insert_get_id(&self, row: Row) -> Result<Value> {
        let id = self.store.insert_get_id(&self.metadata.table, row)?;
        info!(table = %self.metadata.table, id = %id, "inserted record");
        Ok(id)
    }

    /// Update by primary key, returning the affected count
    pub fn update(&self, id: &Value, data: &Row) -> Result<u64> {
        let affected = self.store.update(&self.by_key(id), data)?;
        debug!(table = %self.metadata.table, id = %id, affected, "updated record");
        Ok(affected)
    }

    /// Bulk update of rows where `column = value`
    pub fn update_by(&self, column: &str, value: Value, data: &Row) -> Result<u64> {
        let affected = self
            .store
            .update(&self.query().where_eq(column, value), data)?;
        debug!(table = %self.metadata.table, column, affected, "updated records");
        Ok(affected)
    }

    /// Fail-on-miss lookup, merge `data`, persist, and return the merged row
    pub fn update_by_id(&self, id: &Value, data: &Row) -> Result<Row> {
        let mut row = self.find_by_id(id, &[])?;
        self.store.update(&self.by_key(id), data)?;
        row.extend(data.clone());
        info!(table = %self.metadata.table, id = %id, "updated record");
        Ok(row)
    }

    /// Upsert keyed on arbitrary attributes
    pub fn update_or_create(&self, attributes: &Row, values: &Row) -> Result<Row> {
        Ok(self
            .store
            .update_or_create(&self.metadata.table, attributes, values)?)
    }

    /// Upsert keyed on the primary key
    pub fn update_or_create_data(&self, id: &Value, data: &Row) -> Result<Row> {
        let mut attributes = Row::new();
        attributes.insert(self.metadata.primary_key.clone(), id.clone());
        self.update_or_create(&attributes, data)
    }

    /// Set a registered field, or toggle it when no truthy value is given.
    ///
    /// The toggle is not boolean negation: a current value loosely equal to
    /// 1 becomes 0, and anything else (0, null, "abc") becomes 1.
    pub fn update_by_field(&self, id: &Value, field: &str, value: Option<Value>) -> Result<Row> {
        let accessor = self.fields.accessor(field)?;
        let mut row = self.find_by_id(id, &[])?;

        let next = match value {
            Some(value) if is_truthy(&value) => value,
            _ if is_loosely_one(accessor.get(&row)) => Value::from(0),
            _ => Value::from(1),
        };
        accessor.set(&mut row, next.clone())?;

        let mut data = Row::new();
        data.insert(field.to_string(), next);
        self.store.update(&self.by_key(id), &data)?;

        info!(table = %self.metadata.table, id = %id, field, "updated field");
        Ok(row)
    }

    /// Delete by key; a list of keys is a single bulk delete
    pub fn delete(&self, id: &Value) -> Result<u64> {
        let deleted = match id {
            Value::Array(ids) => self.store.destroy(&self.metadata.table, ids)?,
            _ => {
                self.find_by_id(id, &[])?;
                self.store.delete(&self.by_key(id))?
            }
        };
        info!(table = %self.metadata.table, deleted, "deleted records");
        Ok(deleted)
    }

    pub fn increment(&self, id: &Value, column: &str, amount: i64) -> Result<u64> {
        Ok(self.store.increment(&self.by_key(id), column, amount)?)
    }
}

/// Loose equality with the integer 1 (`1`, `1.0`, `"1"`, `true`)
fn is_loosely_one(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64() == Some(1.0),
        Value::String(s) => s.trim().parse::<f64>().is_ok_and(|f| f == 1.0),
        _ => false,
    }
}
