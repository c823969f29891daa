//! BOM Validator - Authoring-time validation for BOM patterns
//!
//! Turns pattern text into an ordered list of positioned [`Diagnostic`]s for
//! editor integrations. Validation never fails: malformed YAML becomes a single
//! diagnostic covering the whole document.

pub mod diagnostic;
pub mod locator;
pub mod validator;

pub use diagnostic::{Diagnostic, DiagnosticKind, Severity};
pub use locator::LineLocator;
pub use validator::{validate, PatternValidator, ValidatorOptions};
