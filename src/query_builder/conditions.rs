use serde_json::Value;

use crate::filter::{Between, Predicate};

/// Represents the kinds of row constraints a compiled query can carry
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    Simple {
        field: String,
        operator: String,
        value: Value,
    },
    In {
        field: String,
        values: Vec<Value>,
    },
    NotIn {
        field: String,
        values: Vec<Value>,
    },
    Between {
        field: String,
        start: Value,
        end: Value,
    },
    /// Comparison on the date part of a timestamp column
    Date {
        field: String,
        operator: String,
        value: Value,
    },
    /// Comparison on the month number (1-12) of a date column
    Month {
        field: String,
        operator: String,
        value: Value,
    },
}

impl Condition {
    /// Convert condition to SQL string
    pub fn to_sql(&self) -> String {
        match self {
            Condition::Simple {
                field,
                operator,
                value,
            } => match (value, operator.as_str()) {
                (Value::Null, "=") => format!("{field} IS NULL"),
                (Value::Null, "!=" | "<>") => format!("{field} IS NOT NULL"),
                _ => format!("{} {} {}", field, operator, format_value(value)),
            },
            Condition::In { field, values } => {
                if values.is_empty() {
                    return "0 = 1".to_string();
                }
                format!("{field} IN ({})", format_list(values))
            }
            Condition::NotIn { field, values } => {
                if values.is_empty() {
                    return "1 = 1".to_string();
                }
                format!("{field} NOT IN ({})", format_list(values))
            }
            Condition::Between { field, start, end } => {
                format!(
                    "{} BETWEEN {} AND {}",
                    field,
                    format_value(start),
                    format_value(end)
                )
            }
            Condition::Date {
                field,
                operator,
                value,
            } => format!("DATE({}) {} {}", field, operator, format_value(value)),
            Condition::Month {
                field,
                operator,
                value,
            } => format!("MONTH({}) {} {}", field, operator, format_value(value)),
        }
    }
}

impl From<&Predicate> for Condition {
    fn from(predicate: &Predicate) -> Self {
        Condition::Simple {
            field: predicate.column.clone(),
            operator: predicate.operator.clone(),
            value: predicate.value.clone(),
        }
    }
}

impl From<&Between> for Condition {
    fn from(between: &Between) -> Self {
        Condition::Between {
            field: between.column.clone(),
            start: between.start.clone(),
            end: between.end.clone(),
        }
    }
}

/// A parenthesized group of conditions, nested as one conjunct of the query
#[derive(Debug, Clone, PartialEq)]
pub struct WhereClause {
    pub conditions: Vec<Condition>,
    pub operator: LogicalOperator,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalOperator {
    And,
    Or,
}

impl WhereClause {
    /// Create a simple WHERE clause with a single condition
    pub fn simple(field: &str, operator: &str, value: Value) -> Self {
        Self::single(Condition::Simple {
            field: field.to_string(),
            operator: operator.to_string(),
            value,
        })
    }

    /// Wrap one condition as its own group
    pub fn single(condition: Condition) -> Self {
        Self {
            conditions: vec![condition],
            operator: LogicalOperator::And,
        }
    }

    /// Create WHERE IN clause
    pub fn in_condition(field: &str, values: Vec<Value>) -> Self {
        Self::single(Condition::In {
            field: field.to_string(),
            values,
        })
    }

    /// Create WHERE NOT IN clause
    pub fn not_in_condition(field: &str, values: Vec<Value>) -> Self {
        Self::single(Condition::NotIn {
            field: field.to_string(),
            values,
        })
    }

    /// Combine multiple conditions with AND
    pub fn and(conditions: Vec<Condition>) -> Self {
        Self {
            conditions,
            operator: LogicalOperator::And,
        }
    }

    /// Combine multiple conditions with OR
    pub fn or(conditions: Vec<Condition>) -> Self {
        Self {
            conditions,
            operator: LogicalOperator::Or,
        }
    }

    /// An empty group constrains nothing
    pub fn is_unconstrained(&self) -> bool {
        self.conditions.is_empty()
    }

    /// Convert to SQL string
    pub fn to_sql(&self) -> String {
        if self.conditions.is_empty() {
            return "1=1".to_string();
        }

        if self.conditions.len() == 1 {
            return self.conditions[0].to_sql();
        }

        let operator_str = match self.operator {
            LogicalOperator::And => " AND ",
            LogicalOperator::Or => " OR ",
        };

        let condition_sqls: Vec<String> = self.conditions.iter().map(|c| c.to_sql()).collect();

        format!("({})", condition_sqls.join(operator_str))
    }
}

fn format_list(values: &[Value]) -> String {
    values
        .iter()
        .map(format_value)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Format a JSON value for SQL
pub(crate) fn format_value(value: &Value) -> String {
    match value {
        Value::Null => "NULL".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => format!("'{}'", s.replace('\'', "''")),
        _ => format!("'{}'", value.to_string().replace('\'', "''")),
    }
}
