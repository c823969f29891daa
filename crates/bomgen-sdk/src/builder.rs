//! Builder pattern for PatternEngine

use crate::config::EngineConfig;
use crate::engine::PatternEngine;
use bomgen_validator::ValidatorOptions;

/// Builder for PatternEngine
///
/// # Example
///
/// ```rust,ignore
/// use bomgen_sdk::PatternEngineBuilder;
///
/// let engine = PatternEngineBuilder::new()
///     .fill_missing_answers(true)
///     .add_placeholder_product("example")
///     .build();
///
/// let diagnostics = engine.validate(pattern_text);
/// ```
#[derive(Debug, Default)]
pub struct PatternEngineBuilder {
    config: EngineConfig,
}

impl PatternEngineBuilder {
    /// Create a new builder
    pub fn new() -> Self {
        Self {
            config: EngineConfig::new(),
        }
    }

    /// Start from an existing configuration
    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the parse cache capacity (0 disables the cache)
    pub fn with_cache_capacity(mut self, capacity: usize) -> Self {
        self.config.cache_capacity = capacity;
        self
    }

    /// Check answers against the question schema before resolving
    pub fn check_answers(mut self, enable: bool) -> Self {
        self.config.check_answers = enable;
        self
    }

    /// Use question defaults for unanswered questions
    pub fn fill_missing_answers(mut self, enable: bool) -> Self {
        self.config.fill_missing_answers = enable;
        self
    }

    /// Merge product rows with the same part number
    pub fn consolidate_duplicates(mut self, enable: bool) -> Self {
        self.config.consolidate_duplicates = enable;
        self
    }

    /// Skip rules for this product key during resolution
    pub fn add_placeholder_product(mut self, key: impl Into<String>) -> Self {
        self.config.placeholder_products.push(key.into());
        self
    }

    /// Set validator options
    pub fn with_validator_options(mut self, options: ValidatorOptions) -> Self {
        self.config.validator = options;
        self
    }

    /// Build the engine
    pub fn build(self) -> PatternEngine {
        PatternEngine::new(self.config)
    }
}
