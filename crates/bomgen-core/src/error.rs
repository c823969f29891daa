//! Error types for BOM Core

use thiserror::Error;

/// Core error type
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    #[error("Unknown question type: {0}")]
    UnknownQuestionType(String),
}

pub type Result<T> = std::result::Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = CoreError::UnknownQuestionType("decimal".to_string());
        assert_eq!(error.to_string(), "Unknown question type: decimal");
    }
}
