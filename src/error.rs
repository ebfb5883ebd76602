//! # Error Types
//!
//! Structured error handling for descriptor ingestion, compilation and the
//! repository facade using thiserror.

use serde_json::Value;
use thiserror::Error;

use crate::store::StoreError;

/// Errors surfaced by the filter compiler and repository facade
#[derive(Error, Debug, Clone, PartialEq)]
pub enum QueryScopeError {
    /// A tuple-shaped fragment (predicate, join, order, between) is missing
    /// components, or a comma string split into the wrong number of tokens
    #[error("Malformed filter fragment `{fragment}`: {reason}")]
    MalformedFilterFragment { fragment: String, reason: String },

    /// Keyed lookup on the fail-on-miss path found no row
    #[error("No record found in `{table}` for key {id}")]
    NotFound { table: String, id: Value },

    /// Field was not registered with the repository's field registry
    #[error("Field `{field}` is not registered for updates")]
    UnknownField { field: String },

    #[error("Invalid value for field `{field}`: {reason}")]
    InvalidFieldValue { field: String, reason: String },

    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Store failures pass through untouched
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl QueryScopeError {
    pub fn malformed(fragment: impl Into<String>, reason: impl Into<String>) -> Self {
        QueryScopeError::MalformedFilterFragment {
            fragment: fragment.into(),
            reason: reason.into(),
        }
    }

    pub fn not_found(table: impl Into<String>, id: Value) -> Self {
        QueryScopeError::NotFound {
            table: table.into(),
            id,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, QueryScopeError::NotFound { .. })
    }
}

pub type Result<T> = std::result::Result<T, QueryScopeError>;
