//! # Configuration
//!
//! Settings for logging and for the pagination defaults used by stores and
//! the repository facade.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use query_scope::config::ConfigManager;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let manager = ConfigManager::load()?;
//! let per_page = manager.config().pagination.default_per_page;
//! # Ok(())
//! # }
//! ```

pub mod loader;

use serde::{Deserialize, Serialize};

use crate::error::{QueryScopeError, Result};

pub use loader::ConfigManager;

/// Root configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryScopeConfig {
    pub logging: LoggingConfig,
    pub pagination: PaginationConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directive, e.g. `info` or `query_scope=debug`
    pub level: String,
    /// Emit JSON lines instead of human-readable output
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaginationConfig {
    /// Page a store resolves when the caller names none
    pub default_page: u64,
    pub default_per_page: u64,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_page: 1,
            default_per_page: 15,
        }
    }
}

impl QueryScopeConfig {
    /// Validate configuration for consistency and required fields
    pub fn validate(&self) -> Result<()> {
        if self.logging.level.trim().is_empty() {
            return Err(QueryScopeError::Configuration(
                "logging.level must not be empty".to_string(),
            ));
        }

        if self.pagination.default_page == 0 {
            return Err(QueryScopeError::Configuration(
                "pagination.default_page must be greater than 0".to_string(),
            ));
        }

        if self.pagination.default_per_page == 0 {
            return Err(QueryScopeError::Configuration(
                "pagination.default_per_page must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}
