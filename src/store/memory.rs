//! # In-Memory Store
//!
//! Executes compiled queries against JSON rows held in memory. Supports inner
//! and left joins, AND/OR groups, membership, ranges, date parts, multi-column
//! ordering, limits, pagination with totals, and eager loading through
//! declared relations (including dot-qualified paths).

use parking_lot::RwLock;
use serde_json::{Map, Value};
use std::cmp::Ordering;
use std::collections::{BTreeSet, HashMap};
use tracing::debug;

use super::eval::{compare_for_sort, matches_all, matches_join, values_equal, Tuple};
use super::{EntityMetadata, Page, Row, Store, StoreError, StoreResult};
use crate::config::{PaginationConfig, QueryScopeConfig};
use crate::query_builder::{DeferredFragment, EagerLoad, JoinType, Pagination, QueryBuilder};

/// Cardinality of a declared relation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelationKind {
    Many,
    One,
}

/// Declared link from a parent table to a related table:
/// `related.related_column = parent.parent_column`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationDef {
    pub related_table: String,
    pub related_column: String,
    pub parent_column: String,
    pub kind: RelationKind,
}

impl RelationDef {
    /// Related rows carry `foreign_key` pointing at the parent's `local_key`
    pub fn has_many(related_table: &str, foreign_key: &str, local_key: &str) -> Self {
        Self {
            related_table: related_table.to_string(),
            related_column: foreign_key.to_string(),
            parent_column: local_key.to_string(),
            kind: RelationKind::Many,
        }
    }

    pub fn has_one(related_table: &str, foreign_key: &str, local_key: &str) -> Self {
        Self {
            kind: RelationKind::One,
            ..Self::has_many(related_table, foreign_key, local_key)
        }
    }

    /// The parent carries `foreign_key` pointing at the related `owner_key`
    pub fn belongs_to(related_table: &str, foreign_key: &str, owner_key: &str) -> Self {
        Self {
            related_table: related_table.to_string(),
            related_column: owner_key.to_string(),
            parent_column: foreign_key.to_string(),
            kind: RelationKind::One,
        }
    }
}

#[derive(Debug, Clone)]
struct TableData {
    primary_key: String,
    rows: Vec<Row>,
    next_id: i64,
    relations: HashMap<String, RelationDef>,
}

impl TableData {
    fn new(primary_key: &str) -> Self {
        Self {
            primary_key: primary_key.to_string(),
            rows: Vec::new(),
            next_id: 1,
            relations: HashMap::new(),
        }
    }

    fn column_names(&self) -> Vec<String> {
        let names: BTreeSet<&String> = self.rows.iter().flat_map(|r| r.keys()).collect();
        names.into_iter().cloned().collect()
    }

    /// Append a row, assigning an auto-increment key when none is given
    fn insert_row(&mut self, table: &str, mut row: Row) -> StoreResult<Row> {
        match row.get(&self.primary_key).filter(|v| !v.is_null()) {
            Some(key) => {
                let duplicate = self
                    .rows
                    .iter()
                    .any(|r| r.get(&self.primary_key).is_some_and(|k| values_equal(k, key)));
                if duplicate {
                    return Err(StoreError::Constraint {
                        table: table.to_string(),
                        message: format!("duplicate primary key {key}"),
                    });
                }
                if let Some(id) = key.as_i64() {
                    self.next_id = self.next_id.max(id + 1);
                }
            }
            None => {
                row.insert(self.primary_key.clone(), Value::from(self.next_id));
                self.next_id += 1;
            }
        }
        self.rows.push(row.clone());
        Ok(row)
    }
}

fn key_matches(primary_key: &str, row: &Row, keys: &[Value]) -> bool {
    row.get(primary_key)
        .is_some_and(|k| keys.iter().any(|key| values_equal(k, key)))
}

type Tables = HashMap<String, TableData>;

/// In-process relational store over JSON rows
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
    pagination: PaginationConfig,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: &QueryScopeConfig) -> Self {
        Self {
            tables: RwLock::new(HashMap::new()),
            pagination: config.pagination,
        }
    }

    /// Register an empty table; re-registering keeps existing rows
    pub fn create_table(&self, table: &str, primary_key: &str) {
        self.tables
            .write()
            .entry(table.to_string())
            .or_insert_with(|| TableData::new(primary_key));
    }

    pub fn define_relation(
        &self,
        table: &str,
        name: &str,
        relation: RelationDef,
    ) -> StoreResult<()> {
        let mut tables = self.tables.write();
        let data = tables.get_mut(table).ok_or_else(|| table_not_found(table))?;
        data.relations.insert(name.to_string(), relation);
        Ok(())
    }

    /// Insert JSON objects; non-object values are rejected
    pub fn seed<I>(&self, table: &str, rows: I) -> StoreResult<()>
    where
        I: IntoIterator<Item = Value>,
    {
        let mut tables = self.tables.write();
        let data = tables
            .get_mut(table)
            .ok_or_else(|| table_not_found(table))?;
        for value in rows {
            let Value::Object(row) = value else {
                return Err(StoreError::Backend {
                    message: format!("seed rows for `{table}` must be objects"),
                });
            };
            data.insert_row(table, row)?;
        }
        Ok(())
    }

    /// Snapshot of a table's rows in insertion order
    pub fn rows(&self, table: &str) -> StoreResult<Vec<Row>> {
        let tables = self.tables.read();
        Ok(lookup(&tables, table)?.rows.clone())
    }
}

fn table_not_found(table: &str) -> StoreError {
    StoreError::TableNotFound {
        table: table.to_string(),
    }
}

fn lookup<'a>(tables: &'a Tables, table: &str) -> StoreResult<&'a TableData> {
    tables.get(table).ok_or_else(|| table_not_found(table))
}

/// Joined, filtered, ordered and limited working rows
fn select_tuples(tables: &Tables, query: &QueryBuilder) -> StoreResult<Vec<Tuple>> {
    let base = lookup(tables, query.table())?;
    let mut tuples: Vec<Tuple> = base
        .rows
        .iter()
        .map(|row| Tuple::from_row(query.table(), row))
        .collect();

    for join in query.joins() {
        let joined = lookup(tables, &join.table)?;
        let columns = joined.column_names();
        let mut next = Vec::new();
        for tuple in tuples {
            let mut matched = false;
            for row in &joined.rows {
                let mut candidate = tuple.clone();
                candidate.merge(&join.table, row);
                if matches_join(&candidate, &join.on)? {
                    next.push(candidate);
                    matched = true;
                }
            }
            if !matched && join.join_type == JoinType::Left {
                let mut unmatched = tuple;
                unmatched.merge_nulls(&join.table, &columns);
                next.push(unmatched);
            }
        }
        tuples = next;
    }

    let mut filtered = Vec::with_capacity(tuples.len());
    for tuple in tuples {
        if matches_all(&tuple, query.where_clauses())? {
            filtered.push(tuple);
        }
    }

    if !query.orders().is_empty() {
        filtered.sort_by(|a, b| {
            for order in query.orders() {
                let ordering = compare_for_sort(a.resolve(&order.column), b.resolve(&order.column));
                let ordering = if order.direction.is_ascending() {
                    ordering
                } else {
                    ordering.reverse()
                };
                if ordering != Ordering::Equal {
                    return ordering;
                }
            }
            Ordering::Equal
        });
    }

    if let Some(pagination) = query.pagination() {
        let (start, end) = pagination.bounds(filtered.len());
        filtered = filtered.into_iter().skip(start).take(end - start).collect();
    }

    Ok(filtered)
}

/// Apply the select list; `table.column` is exposed as `column`
fn project(tuple: &Tuple, query: &QueryBuilder) -> Row {
    if query.selects_all() {
        return tuple.plain.clone();
    }
    let mut row = Map::new();
    for field in query.select_fields() {
        if let Some(table) = field.strip_suffix(".*") {
            row.extend(tuple.table_columns(table));
            continue;
        }
        let name = field.rsplit('.').next().unwrap_or(field);
        row.insert(name.to_string(), tuple.resolve(field).clone());
    }
    row
}

/// Eager loads grouped by path so `orders` and `orders.items` share one load
#[derive(Debug, Default)]
struct EagerNode {
    name: String,
    fragment: Option<DeferredFragment>,
    children: Vec<EagerNode>,
}

fn eager_tree(loads: &[EagerLoad]) -> Vec<EagerNode> {
    let mut roots: Vec<EagerNode> = Vec::new();
    for load in loads {
        let segments: Vec<&str> = load.segments().collect();
        let mut level = &mut roots;
        for (depth, segment) in segments.iter().enumerate() {
            let index = match level.iter().position(|n| n.name == *segment) {
                Some(index) => index,
                None => {
                    level.push(EagerNode {
                        name: segment.to_string(),
                        ..Default::default()
                    });
                    level.len() - 1
                }
            };
            if depth + 1 == segments.len() {
                level[index].fragment = Some(load.fragment.clone());
            }
            level = &mut level[index].children;
        }
    }
    roots
}

fn materialize(
    tables: &Tables,
    query: &QueryBuilder,
    tuples: Vec<Tuple>,
) -> StoreResult<Vec<Row>> {
    let tree = eager_tree(query.eager_loads());
    let mut rows = Vec::with_capacity(tuples.len());
    for tuple in tuples {
        let mut row = project(&tuple, query);
        // relation keys come from the base table, never from joined columns
        let parent = tuple.table_columns(query.table());
        attach_relations(tables, query.table(), &parent, &tree, &mut row)?;
        rows.push(row);
    }
    Ok(rows)
}

/// Load each relation for one parent, running its deferred fragment
fn attach_relations(
    tables: &Tables,
    parent_table: &str,
    parent: &Row,
    nodes: &[EagerNode],
    out: &mut Row,
) -> StoreResult<()> {
    if nodes.is_empty() {
        return Ok(());
    }
    let parent_data = lookup(tables, parent_table)?;

    for node in nodes {
        let relation = parent_data.relations.get(&node.name).ok_or_else(|| {
            StoreError::RelationNotFound {
                table: parent_table.to_string(),
                relation: node.name.clone(),
            }
        })?;

        let key = parent.get(&relation.parent_column).cloned().unwrap_or(Value::Null);
        let mut related = Vec::new();
        if !key.is_null() {
            let mut scoped = QueryBuilder::new(&relation.related_table)
                .where_eq(&relation.related_column, key);
            if let Some(ref fragment) = node.fragment {
                scoped = fragment.apply(scoped);
            }
            for tuple in select_tuples(tables, &scoped)? {
                let mut row = project(&tuple, &scoped);
                let child = tuple.table_columns(&relation.related_table);
                attach_relations(
                    tables,
                    &relation.related_table,
                    &child,
                    &node.children,
                    &mut row,
                )?;
                related.push(Value::Object(row));
            }
        }

        let value = match relation.kind {
            RelationKind::Many => Value::Array(related),
            RelationKind::One => related.into_iter().next().unwrap_or(Value::Null),
        };
        out.insert(node.name.clone(), value);
    }
    Ok(())
}

/// Primary keys of base-table rows matched by a query
fn matched_keys(tables: &Tables, query: &QueryBuilder) -> StoreResult<Vec<Value>> {
    let base = lookup(tables, query.table())?;
    let qualified = format!("{}.{}", query.table(), base.primary_key);
    Ok(select_tuples(tables, query)?
        .iter()
        .map(|tuple| tuple.resolve(&qualified).clone())
        .collect())
}

fn increment_value(
    table: &str,
    column: &str,
    current: Option<&Value>,
    amount: i64,
) -> StoreResult<Value> {
    match current {
        None | Some(Value::Null) => Ok(Value::from(amount)),
        Some(Value::Number(n)) => match n.as_i64() {
            Some(i) => i
                .checked_add(amount)
                .map(Value::from)
                .ok_or_else(|| StoreError::Constraint {
                    table: table.to_string(),
                    message: format!("increment of `{column}` by {amount} overflows {i}"),
                }),
            None => Ok(Value::from(n.as_f64().unwrap_or(0.0) + amount as f64)),
        },
        Some(other) => Err(StoreError::Constraint {
            table: table.to_string(),
            message: format!("cannot increment non-numeric column `{column}` holding {other}"),
        }),
    }
}

impl Store for MemoryStore {
    fn metadata(&self, entity: &str) -> StoreResult<EntityMetadata> {
        let tables = self.tables.read();
        let data = lookup(&tables, entity)?;
        Ok(EntityMetadata::new(entity, data.primary_key.clone()))
    }

    fn get(&self, query: &QueryBuilder) -> StoreResult<Vec<Row>> {
        let tables = self.tables.read();
        let tuples = select_tuples(&tables, query)?;
        materialize(&tables, query, tuples)
    }

    fn paginate(
        &self,
        query: &QueryBuilder,
        per_page: u64,
        page: Option<u64>,
    ) -> StoreResult<Page> {
        let per_page = if per_page == 0 {
            self.pagination.default_per_page
        } else {
            per_page
        };
        let page = page.unwrap_or(self.pagination.default_page).max(1);

        let tables = self.tables.read();
        let total = select_tuples(&tables, &query.for_count())?.len() as u64;
        let paged = query.clone().paginate(page, per_page);
        let tuples = select_tuples(&tables, &paged)?;
        let data = materialize(&tables, &paged, tuples)?;

        debug!(table = query.table(), page, per_page, total, "paginated query");
        Ok(Page {
            data,
            total,
            per_page,
            current_page: page,
            last_page: Pagination::new(page, per_page).total_pages(total),
        })
    }

    fn first(&self, query: &QueryBuilder) -> StoreResult<Option<Row>> {
        Ok(self.get(&query.clone().limit(1))?.into_iter().next())
    }

    fn count(&self, query: &QueryBuilder) -> StoreResult<u64> {
        let tables = self.tables.read();
        Ok(select_tuples(&tables, &query.for_count())?.len() as u64)
    }

    fn find(&self, query: &QueryBuilder, id: &Value) -> StoreResult<Option<Row>> {
        let primary_key = self.metadata(query.table())?.primary_key;
        self.first(&query.clone().where_eq(&primary_key, id.clone()))
    }

    fn value(&self, query: &QueryBuilder, column: &str) -> StoreResult<Option<Value>> {
        let tables = self.tables.read();
        let tuples = select_tuples(&tables, &query.clone().limit(1))?;
        Ok(tuples.first().map(|tuple| tuple.resolve(column).clone()))
    }

    fn pluck(
        &self,
        query: &QueryBuilder,
        value_column: &str,
        key_column: &str,
    ) -> StoreResult<Map<String, Value>> {
        let tables = self.tables.read();
        Ok(select_tuples(&tables, query)?
            .iter()
            .map(|tuple| {
                let key = match tuple.resolve(key_column) {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                (key, tuple.resolve(value_column).clone())
            })
            .collect())
    }

    fn create(&self, table: &str, data: Row) -> StoreResult<Row> {
        let mut tables = self.tables.write();
        let target = tables.get_mut(table).ok_or_else(|| table_not_found(table))?;
        target.insert_row(table, data)
    }

    fn insert(&self, table: &str, rows: Vec<Row>) -> StoreResult<bool> {
        let mut tables = self.tables.write();
        let target = tables.get_mut(table).ok_or_else(|| table_not_found(table))?;
        for row in rows {
            target.insert_row(table, row)?;
        }
        Ok(true)
    }

    fn insert_get_id(&self, table: &str, row: Row) -> StoreResult<Value> {
        let mut tables = self.tables.write();
        let target = tables.get_mut(table).ok_or_else(|| table_not_found(table))?;
        let inserted = target.insert_row(table, row)?;
        Ok(inserted
            .get(&target.primary_key)
            .cloned()
            .unwrap_or(Value::Null))
    }

    fn update(&self, query: &QueryBuilder, data: &Row) -> StoreResult<u64> {
        let mut tables = self.tables.write();
        let keys = matched_keys(&tables, query)?;
        let target = tables
            .get_mut(query.table())
            .ok_or_else(|| table_not_found(query.table()))?;

        let mut affected = 0;
        let primary_key = target.primary_key.as_str();
        for row in target.rows.iter_mut() {
            if key_matches(primary_key, row, &keys) {
                for (column, value) in data {
                    row.insert(column.clone(), value.clone());
                }
                affected += 1;
            }
        }
        Ok(affected)
    }

    fn update_or_create(&self, table: &str, attributes: &Row, values: &Row) -> StoreResult<Row> {
        let mut tables = self.tables.write();
        let target = tables.get_mut(table).ok_or_else(|| table_not_found(table))?;

        let existing = target.rows.iter_mut().find(|row| {
            attributes.iter().all(|(column, expected)| {
                row.get(column).is_some_and(|actual| {
                    actual == expected || values_equal(actual, expected)
                })
            })
        });

        if let Some(row) = existing {
            for (column, value) in values {
                row.insert(column.clone(), value.clone());
            }
            return Ok(row.clone());
        }

        let mut row = attributes.clone();
        row.extend(values.clone());
        target.insert_row(table, row)
    }

    fn delete(&self, query: &QueryBuilder) -> StoreResult<u64> {
        let mut tables = self.tables.write();
        let keys = matched_keys(&tables, query)?;
        let target = tables
            .get_mut(query.table())
            .ok_or_else(|| table_not_found(query.table()))?;

        let before = target.rows.len();
        let primary_key = target.primary_key.as_str();
        target.rows.retain(|row| !key_matches(primary_key, row, &keys));
        Ok((before - target.rows.len()) as u64)
    }

    fn destroy(&self, table: &str, ids: &[Value]) -> StoreResult<u64> {
        let mut tables = self.tables.write();
        let target = tables.get_mut(table).ok_or_else(|| table_not_found(table))?;

        let before = target.rows.len();
        let primary_key = target.primary_key.as_str();
        target.rows.retain(|row| !key_matches(primary_key, row, ids));
        Ok((before - target.rows.len()) as u64)
    }

    fn increment(&self, query: &QueryBuilder, column: &str, amount: i64) -> StoreResult<u64> {
        let mut tables = self.tables.write();
        let keys = matched_keys(&tables, query)?;
        let table = query.table().to_string();
        let target = tables
            .get_mut(&table)
            .ok_or_else(|| table_not_found(&table))?;

        let mut affected = 0;
        let primary_key = target.primary_key.as_str();
        for row in target.rows.iter_mut() {
            if key_matches(primary_key, row, &keys) {
                let next = increment_value(&table, column, row.get(column), amount)?;
                row.insert(column.to_string(), next);
                affected += 1;
            }
        }
        Ok(affected)
    }
}
