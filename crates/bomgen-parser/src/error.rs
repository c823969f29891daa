//! Parser error types

use thiserror::Error;

/// Parser error
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    /// Malformed YAML. No partial tree is produced.
    #[error("YAML syntax error: {message}")]
    YamlSyntax {
        message: String,
        /// 1-based line, when the YAML library reports one
        line: Option<usize>,
        /// 1-based column, when the YAML library reports one
        column: Option<usize>,
        /// Character offset into the document text
        offset: Option<usize>,
    },

    /// Invalid expression syntax
    #[error("Invalid expression at position {position}: {message}")]
    InvalidExpression {
        message: String,
        /// Character offset into the expression source
        position: usize,
    },
}

impl ParseError {
    pub fn invalid_expression(message: impl Into<String>, position: usize) -> Self {
        ParseError::InvalidExpression {
            message: message.into(),
            position,
        }
    }

    /// Returns true for expression syntax errors
    pub fn is_expression_error(&self) -> bool {
        matches!(self, ParseError::InvalidExpression { .. })
    }
}

/// Result type for parser operations
pub type Result<T> = std::result::Result<T, ParseError>;
