//! Runtime error types

use bomgen_core::Value;
use bomgen_parser::ParseError;
use thiserror::Error;

/// Expression evaluation error
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvalError {
    /// Variable not present in the environment
    #[error("Undefined variable '{0}'")]
    UndefinedVariable(String),

    /// Operand or result of the wrong type
    #[error("Type mismatch: {0}")]
    TypeMismatch(String),

    /// Division or modulo by zero
    #[error("Division by zero")]
    DivideByZero,

    /// Integer overflow or a non-finite float result
    #[error("Arithmetic overflow: {0}")]
    Overflow(String),
}

/// Result type for expression evaluation
pub type EvalResult<T> = std::result::Result<T, EvalError>;

/// Caller answers that do not fit the question schema
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnswerError {
    #[error("Missing input for {question}. Expected type: {expected}")]
    MissingAnswer { question: String, expected: String },

    #[error("Input for {question} must be {expected}, got {found} instead")]
    WrongType {
        question: String,
        expected: String,
        found: String,
    },

    #[error("Input for {question} must be {bound} (got {value})")]
    OutOfRange {
        question: String,
        bound: String,
        value: i64,
    },

    #[error("Input for {question} must be one of [{choices}], got {value}")]
    NotAChoice {
        question: String,
        choices: String,
        value: Value,
    },

    #[error("Missing choices for enum input {question}")]
    MissingChoices { question: String },

    #[error("Unknown expected type: {type_name} for input {question}")]
    UnknownType { question: String, type_name: String },
}

/// Product catalog loading error
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Invalid catalog YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid catalog JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Duplicate part in catalog: {0}")]
    DuplicatePart(String),
}

/// BOM resolution error
///
/// Resolution is fail-fast: the first error aborts the whole BOM. Every
/// variant tied to a rule carries its 1-based number.
#[derive(Error, Debug)]
pub enum ResolutionError {
    #[error("Invalid expression in rule #{rule}{}: {source}", product_label(.product))]
    Expression {
        rule: usize,
        product: Option<String>,
        source: ParseError,
    },

    #[error("Error evaluating rule #{rule}{}: {source}", product_label(.product))]
    Evaluation {
        rule: usize,
        product: Option<String>,
        source: EvalError,
    },

    #[error("Product '{product}' does not exist (rule #{rule})")]
    ProductNotFound { rule: usize, product: String },

    #[error("Invalid quantity in rule #{rule}{}: {message}", product_label(.product))]
    InvalidQuantity {
        rule: usize,
        product: Option<String>,
        message: String,
    },

    #[error("Rule #{rule} is malformed: {message}")]
    MalformedRule { rule: usize, message: String },

    #[error(transparent)]
    Answer(#[from] AnswerError),
}

impl ResolutionError {
    /// 1-based number of the offending rule, if the error is tied to one
    pub fn rule(&self) -> Option<usize> {
        match self {
            ResolutionError::Expression { rule, .. }
            | ResolutionError::Evaluation { rule, .. }
            | ResolutionError::ProductNotFound { rule, .. }
            | ResolutionError::InvalidQuantity { rule, .. }
            | ResolutionError::MalformedRule { rule, .. } => Some(*rule),
            ResolutionError::Answer(_) => None,
        }
    }
}

fn product_label(product: &Option<String>) -> String {
    match product {
        Some(key) => format!(" (product '{}')", key),
        None => String::new(),
    }
}

/// Result type for resolution
pub type Result<T> = std::result::Result<T, ResolutionError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_eval_error_display() {
        assert_eq!(
            EvalError::UndefinedVariable("num_cables".to_string()).to_string(),
            "Undefined variable 'num_cables'"
        );
        assert_eq!(EvalError::DivideByZero.to_string(), "Division by zero");
    }

    #[test]
    fn test_resolution_error_names_rule_and_product() {
        let error = ResolutionError::Evaluation {
            rule: 3,
            product: Some("CAB-3M".to_string()),
            source: EvalError::DivideByZero,
        };
        assert_eq!(
            error.to_string(),
            "Error evaluating rule #3 (product 'CAB-3M'): Division by zero"
        );
        assert_eq!(error.rule(), Some(3));

        let error = ResolutionError::ProductNotFound {
            rule: 1,
            product: "P9".to_string(),
        };
        assert!(error.to_string().contains("'P9'"));
    }

    #[test]
    fn test_answer_error_is_transparent() {
        let error: ResolutionError = AnswerError::MissingChoices {
            question: "support".to_string(),
        }
        .into();
        assert_eq!(error.to_string(), "Missing choices for enum input support");
        assert_eq!(error.rule(), None);
    }
}
