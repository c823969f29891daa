//! Abstract Syntax Tree definitions
//!
//! This module contains the expression AST and the Pattern schema model
//! (questions and rules) extracted from a pattern document.

pub mod expression;
pub mod operator;
pub mod pattern;

pub use expression::{Expression, UnaryOperator};
pub use operator::Operator;
pub use pattern::{
    IssueSubject, PatternDocument, ProductRule, Quantity, Question, QuestionType, RawRule, Rule,
    SchemaIssue, SchemaViolation,
};
