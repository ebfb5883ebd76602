use crate::filter::JoinSpec;

/// Represents the supported SQL JOINs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinType {
    Inner,
    Left,
}

impl JoinType {
    pub fn to_sql(&self) -> &'static str {
        match self {
            JoinType::Inner => "INNER JOIN",
            JoinType::Left => "LEFT JOIN",
        }
    }
}

/// Column comparison in an ON clause
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinConstraint {
    pub first: String,
    pub operator: String,
    pub second: String,
}

/// Represents a SQL JOIN clause
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Join {
    pub join_type: JoinType,
    pub table: String,
    pub on: JoinConstraint,
}

impl Join {
    fn new(join_type: JoinType, table: &str, first: &str, operator: &str, second: &str) -> Self {
        Self {
            join_type,
            table: table.to_string(),
            on: JoinConstraint {
                first: first.to_string(),
                operator: operator.to_string(),
                second: second.to_string(),
            },
        }
    }

    /// Create an INNER JOIN
    pub fn inner(table: &str, first: &str, operator: &str, second: &str) -> Self {
        Self::new(JoinType::Inner, table, first, operator, second)
    }

    /// Create a LEFT JOIN
    pub fn left(table: &str, first: &str, operator: &str, second: &str) -> Self {
        Self::new(JoinType::Left, table, first, operator, second)
    }

    /// Convert to SQL string
    pub fn to_sql(&self) -> String {
        format!(
            "{} {} ON {} {} {}",
            self.join_type.to_sql(),
            self.table,
            self.on.first,
            self.on.operator,
            self.on.second
        )
    }
}

impl From<&JoinSpec> for Join {
    fn from(spec: &JoinSpec) -> Self {
        Join::inner(
            &spec.table,
            &spec.table_column,
            &spec.operator,
            &spec.source_column,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inner_join() {
        let join = Join::inner("users", "users.id", "=", "posts.user_id");
        assert_eq!(join.to_sql(), "INNER JOIN users ON users.id = posts.user_id");
    }

    #[test]
    fn test_left_join() {
        let join = Join::left("profiles", "profiles.user_id", "=", "users.id");
        assert_eq!(
            join.to_sql(),
            "LEFT JOIN profiles ON profiles.user_id = users.id"
        );
    }

    #[test]
    fn test_from_spec_is_inner() {
        let spec = JoinSpec::new("orders", "orders.user_id", "=", "users.id");
        let join = Join::from(&spec);
        assert_eq!(join.join_type, JoinType::Inner);
        assert_eq!(join.on.second, "users.id");
    }
}
