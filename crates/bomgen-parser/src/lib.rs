//! BOM Parser - YAML to pattern model parser
//!
//! This crate turns raw pattern text into the structures the rest of the
//! engine works on:
//! - [`YamlParser`]: YAML text to a generic [`Node`] tree with source spans
//! - [`PatternParser`]: node tree to the typed [`PatternDocument`] model
//! - [`ExpressionParser`]: condition and quantity strings to [`Expression`] ASTs
//!
//! [`PatternDocument`]: bomgen_core::PatternDocument
//! [`Expression`]: bomgen_core::Expression

pub mod error;
pub mod expression_parser;
pub mod lexer;
pub mod node;
pub mod pattern_parser;
pub mod yaml_parser;

// Re-export main parser types
pub use error::{ParseError, Result};
pub use expression_parser::ExpressionParser;
pub use node::{Node, NodeKind};
pub use pattern_parser::PatternParser;
pub use yaml_parser::YamlParser;
