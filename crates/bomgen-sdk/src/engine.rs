//! PatternEngine - Main API for validating patterns and generating BOMs

use crate::cache::ParseCache;
use crate::config::EngineConfig;
use crate::error::Result;
use bomgen_core::{Environment, PatternDocument, Question};
use bomgen_parser::PatternParser;
use bomgen_runtime::{
    AnswerChecker, Bom, ProductLookup, ResolutionError, Resolver, ResolverOptions,
};
use bomgen_validator::{Diagnostic, PatternValidator};
use std::sync::Arc;

/// Main pattern engine
///
/// Holds no per-request state; a single engine can be shared between threads.
pub struct PatternEngine {
    /// Configuration
    config: EngineConfig,

    /// Validator built from the configured options
    validator: PatternValidator,

    /// Parsed documents keyed by pattern text
    cache: ParseCache,
}

impl PatternEngine {
    /// Create a new pattern engine from configuration
    pub fn new(config: EngineConfig) -> Self {
        tracing::info!(
            "Pattern engine created (cache capacity {}, answer checks {})",
            config.cache_capacity,
            if config.check_answers { "on" } else { "off" }
        );

        Self {
            validator: PatternValidator::with_options(config.validator.clone()),
            cache: ParseCache::new(config.cache_capacity),
            config,
        }
    }

    /// Get configuration
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Parse pattern text into a document
    ///
    /// Schema problems are recorded on the returned document; only malformed
    /// YAML is an error.
    pub fn parse(&self, text: &str) -> Result<Arc<PatternDocument>> {
        if let Some(document) = self.cache.get(text) {
            tracing::debug!("Parse cache hit");
            return Ok(document);
        }

        let document = Arc::new(PatternParser::parse(text)?);
        self.cache.insert(text, Arc::clone(&document));
        Ok(document)
    }

    /// Validate pattern text and return its diagnostics in document order
    pub fn validate(&self, text: &str) -> Vec<Diagnostic> {
        let diagnostics = match self.cache.get(text) {
            Some(document) => self.validator.validate_document(text, &document),
            None => self.validator.validate(text),
        };

        let errors = diagnostics.iter().filter(|d| d.is_error()).count();
        tracing::debug!(
            "Validation produced {} errors and {} warnings",
            errors,
            diagnostics.len() - errors
        );
        diagnostics
    }

    /// Questions of a pattern in declaration order
    pub fn questions(&self, text: &str) -> Result<Vec<Question>> {
        Ok(self.parse(text)?.questions.clone())
    }

    /// Generate the BOM for pattern text and a set of answers
    pub fn resolve(
        &self,
        text: &str,
        answers: &Environment,
        catalog: &dyn ProductLookup,
    ) -> Result<Bom> {
        let document = self.parse(text)?;
        self.resolve_document(&document, answers, catalog)
    }

    /// Generate the BOM for an already parsed document
    pub fn resolve_document(
        &self,
        document: &PatternDocument,
        answers: &Environment,
        catalog: &dyn ProductLookup,
    ) -> Result<Bom> {
        let filled;
        let answers = if self.config.fill_missing_answers {
            filled = AnswerChecker::with_defaults(document, answers);
            &filled
        } else {
            answers
        };

        if self.config.check_answers {
            AnswerChecker::check(document, answers).map_err(ResolutionError::from)?;
        }

        let options = ResolverOptions {
            placeholder_products: self.config.placeholder_products.clone(),
        };
        let bom = Resolver::new(catalog)
            .with_options(options)
            .resolve(document, answers)?;

        tracing::info!("Generated BOM with {} line items", bom.len());

        if self.config.consolidate_duplicates {
            Ok(bom.consolidated())
        } else {
            Ok(bom)
        }
    }

    /// Drop every cached document
    pub fn clear_cache(&self) {
        self.cache.clear();
    }

    /// Number of cached documents
    pub fn cached_documents(&self) -> usize {
        self.cache.len()
    }
}

impl Default for PatternEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}
