//! BOM Pattern Engine SDK
//!
//! High-level API for validating BOM patterns and generating bills of
//! materials from them.

pub mod builder;
pub mod cache;
pub mod config;
pub mod engine;
pub mod error;

// Re-export main types
pub use builder::PatternEngineBuilder;
pub use cache::ParseCache;
pub use config::EngineConfig;
pub use engine::PatternEngine;
pub use error::{Result, SdkError};

// Re-export commonly used types from dependencies
pub use bomgen_core::{Environment, PatternDocument, Question, QuestionType, Value};
pub use bomgen_runtime::{
    Bom, InMemoryCatalog, LineItem, ProductLookup, ProductMetadata, ResolutionError,
};
pub use bomgen_validator::{Diagnostic, DiagnosticKind, Severity, ValidatorOptions};
