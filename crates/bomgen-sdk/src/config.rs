//! Configuration types for PatternEngine

use crate::error::{Result, SdkError};
use bomgen_validator::ValidatorOptions;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Prefix of environment variables overriding file settings
pub const ENV_PREFIX: &str = "BOMGEN";

/// Main engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Maximum number of cached parsed documents (0 disables the cache)
    pub cache_capacity: usize,

    /// Check answers against the question schema before resolving
    pub check_answers: bool,

    /// Use question defaults for unanswered questions
    pub fill_missing_answers: bool,

    /// Merge product rows with the same part into one row
    pub consolidate_duplicates: bool,

    /// Product keys skipped during resolution
    pub placeholder_products: Vec<String>,

    /// Validator options
    pub validator: ValidatorOptions,
}

impl EngineConfig {
    /// Create a new engine configuration
    pub fn new() -> Self {
        Self {
            cache_capacity: 64,
            check_answers: true,
            fill_missing_answers: false,
            consolidate_duplicates: false,
            placeholder_products: Vec::new(),
            validator: ValidatorOptions::default(),
        }
    }

    /// Load configuration from an optional YAML file and `BOMGEN_*` environment variables.
    ///
    /// Environment variables win over the file. Nested keys use a double
    /// underscore (`BOMGEN_VALIDATOR__MAX_RAW_CELLS`); `BOMGEN_PLACEHOLDER_PRODUCTS`
    /// is a comma-separated list.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let settings = config::Config::builder()
            .add_source(config::File::from(path).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("placeholder_products"),
            )
            .build()
            .map_err(|e| SdkError::ConfigError(format!("Failed to load config: {}", e)))?;

        let config: Self = settings
            .try_deserialize()
            .map_err(|e| SdkError::ConfigError(format!("Failed to deserialize config: {}", e)))?;

        tracing::info!("Loaded engine configuration from {}", path.display());
        Ok(config)
    }

    /// Parse configuration from YAML text
    pub fn from_yaml_str(text: &str) -> Result<Self> {
        serde_yaml::from_str(text)
            .map_err(|e| SdkError::ConfigError(format!("Invalid YAML configuration: {}", e)))
    }

    /// Set the parse cache capacity
    pub fn with_cache_capacity(mut self, capacity: usize) -> Self {
        self.cache_capacity = capacity;
        self
    }

    /// Enable answer checking
    pub fn check_answers(mut self, enable: bool) -> Self {
        self.check_answers = enable;
        self
    }

    /// Enable filling unanswered questions with defaults
    pub fn fill_missing_answers(mut self, enable: bool) -> Self {
        self.fill_missing_answers = enable;
        self
    }

    /// Enable merging of duplicate product rows
    pub fn consolidate_duplicates(mut self, enable: bool) -> Self {
        self.consolidate_duplicates = enable;
        self
    }

    /// Add a placeholder product key
    pub fn with_placeholder_product(mut self, key: impl Into<String>) -> Self {
        self.placeholder_products.push(key.into());
        self
    }

    /// Set validator options
    pub fn with_validator(mut self, options: ValidatorOptions) -> Self {
        self.validator = options;
        self
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new()
    }
}
