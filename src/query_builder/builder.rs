use serde_json::Value;

use super::conditions::{Condition, WhereClause};
use super::eager::EagerLoad;
use super::joins::Join;
use super::pagination::Pagination;
use crate::filter::{Between, OrderSpec};

/// Query-state value threaded through the compiler stages.
///
/// Every stage consumes the builder and returns a new one, so a compiled
/// query is never shared between calls.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryBuilder {
    base_table: String,
    select_fields: Vec<String>,
    joins: Vec<Join>,
    where_clauses: Vec<WhereClause>,
    eager_loads: Vec<EagerLoad>,
    order_by: Vec<OrderSpec>,
    pagination: Option<Pagination>,
}

impl QueryBuilder {
    /// Create a new query builder for the given table
    pub fn new(table: &str) -> Self {
        Self {
            base_table: table.to_string(),
            select_fields: vec!["*".to_string()],
            joins: Vec::new(),
            where_clauses: Vec::new(),
            eager_loads: Vec::new(),
            order_by: Vec::new(),
            pagination: None,
        }
    }

    /// Set specific fields to select
    pub fn select<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let fields: Vec<String> = fields.into_iter().map(|f| f.as_ref().to_string()).collect();
        if !fields.is_empty() {
            self.select_fields = fields;
        }
        self
    }

    /// Add a JOIN clause
    pub fn join(mut self, join: Join) -> Self {
        self.joins.push(join);
        self
    }

    /// Add an INNER JOIN
    pub fn inner_join(self, table: &str, first: &str, operator: &str, second: &str) -> Self {
        self.join(Join::inner(table, first, operator, second))
    }

    /// Add a WHERE group; groups are AND-ed together
    pub fn where_clause(mut self, clause: WhereClause) -> Self {
        self.where_clauses.push(clause);
        self
    }

    /// Add a simple WHERE condition
    pub fn where_eq(self, field: &str, value: Value) -> Self {
        self.where_clause(WhereClause::simple(field, "=", value))
    }

    /// Add WHERE IN condition
    pub fn where_in(self, field: &str, values: Vec<Value>) -> Self {
        self.where_clause(WhereClause::in_condition(field, values))
    }

    /// Add WHERE NOT IN condition
    pub fn where_not_in(self, field: &str, values: Vec<Value>) -> Self {
        self.where_clause(WhereClause::not_in_condition(field, values))
    }

    /// Add an inclusive BETWEEN condition
    pub fn where_between(self, between: &Between) -> Self {
        self.where_clause(WhereClause::single(Condition::from(between)))
    }

    /// Compare the date part of a column
    pub fn where_date(self, field: &str, operator: &str, value: Value) -> Self {
        self.where_clause(WhereClause::single(Condition::Date {
            field: field.to_string(),
            operator: operator.to_string(),
            value,
        }))
    }

    /// Compare the month part of a column
    pub fn where_month(self, field: &str, operator: &str, value: Value) -> Self {
        self.where_clause(WhereClause::single(Condition::Month {
            field: field.to_string(),
            operator: operator.to_string(),
            value,
        }))
    }

    /// Register an eager-load request
    pub fn with(mut self, load: EagerLoad) -> Self {
        self.eager_loads.push(load);
        self
    }

    /// Add ORDER BY clause
    pub fn order_by(mut self, order: OrderSpec) -> Self {
        self.order_by.push(order);
        self
    }

    /// Add LIMIT clause
    pub fn limit(mut self, limit: u64) -> Self {
        if let Some(ref mut pagination) = self.pagination {
            pagination.limit = Some(limit);
        } else {
            self.pagination = Some(Pagination::limit_only(limit));
        }
        self
    }

    /// Page-based LIMIT/OFFSET; replaces any raw limit already applied
    pub fn paginate(mut self, page: u64, per_page: u64) -> Self {
        self.pagination = Some(Pagination::new(page, per_page));
        self
    }

    /// Same query without ordering or limits, for counting
    pub fn for_count(&self) -> Self {
        let mut count_builder = self.clone();
        count_builder.select_fields = vec!["COUNT(*)".to_string()];
        count_builder.order_by.clear();
        count_builder.pagination = None;
        count_builder.eager_loads.clear();
        count_builder
    }

    pub fn table(&self) -> &str {
        &self.base_table
    }

    pub fn select_fields(&self) -> &[String] {
        &self.select_fields
    }

    /// True when every column is projected
    pub fn selects_all(&self) -> bool {
        self.select_fields.iter().any(|f| f == "*")
    }

    pub fn joins(&self) -> &[Join] {
        &self.joins
    }

    pub fn where_clauses(&self) -> &[WhereClause] {
        &self.where_clauses
    }

    pub fn eager_loads(&self) -> &[EagerLoad] {
        &self.eager_loads
    }

    pub fn orders(&self) -> &[OrderSpec] {
        &self.order_by
    }

    pub fn pagination(&self) -> Option<&Pagination> {
        self.pagination.as_ref()
    }

    /// Build the complete SQL query string (eager loads run as separate queries)
    pub fn build_sql(&self) -> String {
        let mut sql = String::new();

        // SELECT clause
        sql.push_str("SELECT ");
        sql.push_str(&self.select_fields.join(", "));

        // FROM clause
        sql.push_str(&format!(" FROM {}", self.base_table));

        // JOIN clauses
        for join in &self.joins {
            sql.push(' ');
            sql.push_str(&join.to_sql());
        }

        // WHERE clauses
        if !self.where_clauses.is_empty() {
            sql.push_str(" WHERE ");
            let where_parts: Vec<String> = self
                .where_clauses
                .iter()
                .map(|clause| clause.to_sql())
                .collect();
            sql.push_str(&where_parts.join(" AND "));
        }

        // ORDER BY
        if !self.order_by.is_empty() {
            let orders: Vec<String> = self
                .order_by
                .iter()
                .map(|o| format!("{} {}", o.column, o.direction.as_sql()))
                .collect();
            sql.push_str(&format!(" ORDER BY {}", orders.join(", ")));
        }

        // LIMIT/OFFSET
        if let Some(ref pagination) = self.pagination {
            sql.push_str(&pagination.to_sql());
        }

        sql
    }
}
