//! BOM Core - Core types and definitions for the BOM pattern engine
//!
//! This crate provides the fundamental types shared by every stage of the engine:
//! - Value types and the variable environment
//! - Expression AST definitions
//! - The Pattern schema model (questions and rules)
//! - Source spans and error types

pub mod ast;
pub mod error;
pub mod types;

// Re-export commonly used types
pub use ast::{Expression, Operator, PatternDocument, Question, QuestionType, Rule, UnaryOperator};
pub use error::CoreError;
pub use types::{Environment, Span, Value};
