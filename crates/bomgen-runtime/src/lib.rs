//! BOM Runtime - Evaluation and resolution engine for BOM patterns
//!
//! This crate evaluates pattern expressions against an answer environment and
//! resolves a parsed pattern into an ordered bill of materials:
//! - Expression evaluation (`Evaluator`)
//! - Answer checking against the question schema (`AnswerChecker`)
//! - The product catalog boundary (`ProductLookup`)
//! - Resolution into line items (`Resolver`) and BOM rendering (`Bom`)

pub mod answers;
pub mod bom;
pub mod catalog;
pub mod engine;
pub mod error;
pub mod resolver;

// Re-export main types
pub use answers::AnswerChecker;
pub use bom::{format_currency, format_percentage, Bom, LineItem, BOM_HEADERS};
pub use catalog::{InMemoryCatalog, ProductLookup, ProductMetadata};
pub use engine::Evaluator;
pub use error::{AnswerError, CatalogError, EvalError, ResolutionError, Result};
pub use resolver::{resolve, Resolver, ResolverOptions};
