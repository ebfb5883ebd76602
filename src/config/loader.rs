//! Configuration Loader
//!
//! Environment-aware loading: built-in defaults, then `query_scope.toml`,
//! then `query_scope.{environment}.toml`, then `QUERY_SCOPE__*` variables.

use config::{Config, Environment, File};
use std::env;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

use super::QueryScopeConfig;
use crate::error::{QueryScopeError, Result};

const CONFIG_BASENAME: &str = "query_scope";
const ENV_PREFIX: &str = "QUERY_SCOPE";

/// Loaded configuration plus the environment it was resolved for
#[derive(Debug)]
pub struct ConfigManager {
    config: QueryScopeConfig,
    environment: String,
    config_directory: PathBuf,
}

impl ConfigManager {
    /// Load configuration with environment auto-detection
    pub fn load() -> Result<Arc<ConfigManager>> {
        Self::load_from_directory(None)
    }

    /// Load configuration from a specific directory
    pub fn load_from_directory(config_dir: Option<PathBuf>) -> Result<Arc<ConfigManager>> {
        let environment = Self::detect_environment();
        Self::load_from_directory_with_env(config_dir, &environment)
    }

    /// Load configuration from a specific directory with explicit environment
    pub fn load_from_directory_with_env(
        config_dir: Option<PathBuf>,
        environment: &str,
    ) -> Result<Arc<ConfigManager>> {
        let config_directory = config_dir.unwrap_or_else(|| PathBuf::from("config"));

        debug!(
            environment = environment,
            directory = %config_directory.display(),
            "loading configuration"
        );

        let config = Self::build(&config_directory, environment)?;
        config.validate()?;

        debug!(
            level = %config.logging.level,
            default_per_page = config.pagination.default_per_page,
            "configuration loaded"
        );

        Ok(Arc::new(ConfigManager {
            config,
            environment: environment.to_string(),
            config_directory,
        }))
    }

    fn build(directory: &Path, environment: &str) -> Result<QueryScopeConfig> {
        let defaults = QueryScopeConfig::default();
        let base = directory.join(CONFIG_BASENAME);
        let overlay = directory.join(format!("{CONFIG_BASENAME}.{environment}"));

        let settings = Config::builder()
            .set_default("logging.level", defaults.logging.level)
            .and_then(|b| b.set_default("logging.json", defaults.logging.json))
            .and_then(|b| {
                b.set_default(
                    "pagination.default_page",
                    defaults.pagination.default_page as i64,
                )
            })
            .and_then(|b| {
                b.set_default(
                    "pagination.default_per_page",
                    defaults.pagination.default_per_page as i64,
                )
            })
            .map_err(config_error)?
            .add_source(File::from(base).required(false))
            .add_source(File::from(overlay).required(false))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(config_error)?;

        settings.try_deserialize().map_err(config_error)
    }

    /// Current environment from `QUERY_SCOPE_ENV`, then `APP_ENV`
    pub fn detect_environment() -> String {
        env::var("QUERY_SCOPE_ENV")
            .or_else(|_| env::var("APP_ENV"))
            .unwrap_or_else(|_| "development".to_string())
    }

    pub fn config(&self) -> &QueryScopeConfig {
        &self.config
    }

    pub fn environment(&self) -> &str {
        &self.environment
    }

    pub fn config_directory(&self) -> &Path {
        &self.config_directory
    }
}

fn config_error(error: config::ConfigError) -> QueryScopeError {
    QueryScopeError::Configuration(error.to_string())
}
