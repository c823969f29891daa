//! Validation diagnostics

use bomgen_core::ast::SchemaViolation;
use bomgen_core::Span;
use bomgen_runtime::EvalError;
use serde::{Deserialize, Serialize};

/// Severity level for validation diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

/// What a diagnostic is about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// Malformed YAML
    YamlSyntax,
    /// Shape or consistency problem in the question/rule schema
    SchemaViolation(SchemaViolation),
    /// Condition or quantity that does not parse
    ExpressionSyntax,
    /// Expression referencing a name no question declares
    UndefinedVariable,
    TypeMismatch,
    DivideByZero,
    Overflow,
    /// Quantity that cannot be a whole number of items
    InvalidQuantity,
    /// Question referenced by no condition or quantity
    UnusedQuestion,
}

impl DiagnosticKind {
    /// Stable diagnostic code (`E...` for errors, `W...` for warnings)
    pub fn code(&self) -> &'static str {
        match self {
            DiagnosticKind::YamlSyntax => "E001",
            DiagnosticKind::SchemaViolation(v) if v.is_warning() => "W002",
            DiagnosticKind::SchemaViolation(_) => "E002",
            DiagnosticKind::ExpressionSyntax => "E003",
            DiagnosticKind::UndefinedVariable => "E004",
            DiagnosticKind::TypeMismatch => "E005",
            DiagnosticKind::DivideByZero => "E006",
            DiagnosticKind::Overflow => "E007",
            DiagnosticKind::InvalidQuantity => "E008",
            DiagnosticKind::UnusedQuestion => "W001",
        }
    }
}

impl DiagnosticKind {
    /// Schema violation about a question's choices
    pub fn is_choices_violation(&self) -> bool {
        matches!(self, DiagnosticKind::SchemaViolation(v) if v.is_choices_violation())
    }
}

impl From<&EvalError> for DiagnosticKind {
    fn from(error: &EvalError) -> Self {
        match error {
            EvalError::UndefinedVariable(_) => DiagnosticKind::UndefinedVariable,
            EvalError::TypeMismatch(_) => DiagnosticKind::TypeMismatch,
            EvalError::DivideByZero => DiagnosticKind::DivideByZero,
            EvalError::Overflow(_) => DiagnosticKind::Overflow,
        }
    }
}

/// A single positioned diagnostic
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Character range in the validated text
    pub range: Span,

    pub severity: Severity,

    pub kind: DiagnosticKind,

    /// Human-readable message
    pub message: String,
}

impl Diagnostic {
    /// Create a new error diagnostic
    pub fn error(range: Span, kind: DiagnosticKind, message: impl Into<String>) -> Self {
        Self {
            range,
            severity: Severity::Error,
            kind,
            message: message.into(),
        }
    }

    /// Create a new warning diagnostic
    pub fn warning(range: Span, kind: DiagnosticKind, message: impl Into<String>) -> Self {
        Self {
            range,
            severity: Severity::Warning,
            kind,
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }

    pub fn code(&self) -> &'static str {
        self.kind.code()
    }
}
