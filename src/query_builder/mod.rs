//! # Query Builder
//!
//! The query-state value the filter compiler threads through its stages, and
//! the SQL rendering of that state.
//!
//! - [`builder`] - [`QueryBuilder`], the immutable-by-convention query state
//! - [`conditions`] - WHERE groups with AND/OR combination
//! - [`joins`] - JOIN clauses built from descriptor quads
//! - [`pagination`] - LIMIT/OFFSET and page arithmetic
//! - [`eager`] - eager-load requests carrying deferred fragments

pub mod builder;
pub mod conditions;
pub mod eager;
pub mod joins;
pub mod pagination;

pub use builder::QueryBuilder;
pub use conditions::{Condition, LogicalOperator, WhereClause};
pub use eager::{DeferredFragment, EagerLoad};
pub use joins::{Join, JoinConstraint, JoinType};
pub use pagination::Pagination;
