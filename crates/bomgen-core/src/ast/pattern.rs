//! Pattern schema model
//!
//! A pattern is an ordered list of questions followed by an ordered list of
//! rules. The model is extracted best-effort from the parsed YAML tree: fields
//! the author got wrong are left empty and described by a [`SchemaIssue`]
//! instead of failing extraction.

use crate::error::CoreError;
use crate::types::{Span, Value};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

// =============================================================================
// Questions
// =============================================================================

/// Type of a question's answer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionType {
    Integer,
    Boolean,
    Enum,
}

impl QuestionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuestionType::Integer => "integer",
            QuestionType::Boolean => "boolean",
            QuestionType::Enum => "enum",
        }
    }
}

impl FromStr for QuestionType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "integer" => Ok(QuestionType::Integer),
            "boolean" => Ok(QuestionType::Boolean),
            "enum" => Ok(QuestionType::Enum),
            other => Err(CoreError::UnknownQuestionType(other.to_string())),
        }
    }
}

impl fmt::Display for QuestionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A typed prompt shown to the BOM requester
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    /// Variable name, unique across the document
    pub name: Option<String>,

    /// Parsed answer type (None when missing or unknown)
    pub question_type: Option<QuestionType>,

    /// The `type` field as written
    pub type_name: Option<String>,

    /// Display text
    pub prompt: Option<String>,

    /// Optional help text shown below the prompt
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Default answer
    pub default: Option<Value>,

    /// Allowed answers (enum questions)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub choices: Option<Vec<Value>>,

    /// Inclusive lower bound (integer questions)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<i64>,

    /// Inclusive upper bound (integer questions)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<i64>,

    /// Source range of the question entry
    pub span: Span,
}

impl Question {
    /// Name used in messages, even for unnamed questions
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("<unnamed>")
    }

    /// Returns true if `value` is one of the declared choices
    pub fn has_choice(&self, value: &Value) -> bool {
        self.choices
            .as_ref()
            .map(|choices| choices.iter().any(|c| c.equals(value)))
            .unwrap_or(false)
    }
}

// =============================================================================
// Rules
// =============================================================================

/// Quantity of a product rule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Quantity {
    /// Number written directly in the document
    Literal(Value),
    /// Expression source, evaluated against the answers
    Expression(String),
}

/// A verbatim BOM row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawRule {
    pub cells: Vec<Value>,
    pub span: Span,
}

/// A conditional, catalog-backed BOM row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRule {
    /// Boolean expression source; absent means always true
    pub condition: Option<String>,

    /// Catalog key
    pub product: Option<String>,

    pub quantity: Option<Quantity>,

    pub span: Span,
}

/// One entry of the rules section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rule {
    Raw(RawRule),
    Product(ProductRule),
}

impl Rule {
    pub fn span(&self) -> Span {
        match self {
            Rule::Raw(raw) => raw.span,
            Rule::Product(product) => product.span,
        }
    }

    pub fn as_product(&self) -> Option<&ProductRule> {
        match self {
            Rule::Product(product) => Some(product),
            Rule::Raw(_) => None,
        }
    }
}

// =============================================================================
// Schema issues
// =============================================================================

/// Class of a schema problem found while extracting or checking the model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SchemaViolation {
    /// Expected a mapping (root, question entry, rule entry, `add`)
    NotAMapping,
    /// Expected a sequence (`questions`, `products`, `raw`, `choices`)
    NotASequence,
    MissingField,
    InvalidFieldType,
    UnknownQuestionType,
    DuplicateName,
    /// Enum question without choices
    MissingChoices,
    /// Enum default that is not one of the choices
    InvalidEnumDefault,
    /// Boolean question carrying choices
    UnexpectedChoices,
    /// Default whose type does not match the question type
    InvalidDefault,
    /// `min` greater than `max`
    InvalidBounds,
    DefaultOutOfRange,
    /// `min`/`max` on a non-integer question
    BoundsNotApplicable,
    EmptyRawRow,
    RawRowTooWide,
    /// Both `products` and `rules` are present
    AmbiguousRulesKey,
}

impl SchemaViolation {
    /// Violations that are reported as warnings rather than errors
    pub fn is_warning(&self) -> bool {
        matches!(
            self,
            SchemaViolation::AmbiguousRulesKey | SchemaViolation::BoundsNotApplicable
        )
    }

    /// Choices missing where required or present where forbidden
    pub fn is_choices_violation(&self) -> bool {
        matches!(
            self,
            SchemaViolation::MissingChoices | SchemaViolation::UnexpectedChoices
        )
    }
}

/// What a schema issue is about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IssueSubject {
    /// The document or one of its sections, with the offending range
    Document(Span),
    /// Question at the given index
    Question(usize),
    /// Rule at the given index
    Rule(usize),
}

/// A shape problem recorded during extraction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaIssue {
    pub subject: IssueSubject,
    pub violation: SchemaViolation,
    pub message: String,
}

impl SchemaIssue {
    pub fn new(subject: IssueSubject, violation: SchemaViolation, message: impl Into<String>) -> Self {
        Self {
            subject,
            violation,
            message: message.into(),
        }
    }
}

// =============================================================================
// Document
// =============================================================================

/// A parsed pattern: questions, rules and the issues met while extracting them
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PatternDocument {
    /// Questions in display order
    pub questions: Vec<Question>,

    /// Rules in evaluation order
    pub rules: Vec<Rule>,

    /// Extraction issues, in document order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub issues: Vec<SchemaIssue>,
}

impl PatternDocument {
    /// Every declared question name, order-independent
    pub fn question_names(&self) -> BTreeSet<&str> {
        self.questions
            .iter()
            .filter_map(|q| q.name.as_deref())
            .collect()
    }

    /// First question declared with `name`
    pub fn question(&self, name: &str) -> Option<&Question> {
        self.questions
            .iter()
            .find(|q| q.name.as_deref() == Some(name))
    }

    /// Iterate over the product rules together with their rule index
    pub fn product_rules(&self) -> impl Iterator<Item = (usize, &ProductRule)> {
        self.rules
            .iter()
            .enumerate()
            .filter_map(|(i, rule)| rule.as_product().map(|p| (i, p)))
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty() && self.rules.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn enum_question() -> Question {
        Question {
            name: Some("support_years".to_string()),
            question_type: Some(QuestionType::Enum),
            type_name: Some("enum".to_string()),
            prompt: Some("How many years of support?".to_string()),
            description: None,
            default: Some(Value::Integer(3)),
            choices: Some(vec![Value::Integer(1), Value::Integer(3), Value::Integer(5)]),
            min: None,
            max: None,
            span: Span::new(0, 10),
        }
    }

    #[test]
    fn test_question_type_from_str() {
        assert_eq!("integer".parse::<QuestionType>().unwrap(), QuestionType::Integer);
        assert_eq!("boolean".parse::<QuestionType>().unwrap(), QuestionType::Boolean);
        assert_eq!("enum".parse::<QuestionType>().unwrap(), QuestionType::Enum);
        assert!(matches!(
            "decimal".parse::<QuestionType>(),
            Err(CoreError::UnknownQuestionType(t)) if t == "decimal"
        ));
    }

    #[test]
    fn test_has_choice_uses_value_equality() {
        let question = enum_question();
        assert!(question.has_choice(&Value::Integer(3)));
        assert!(question.has_choice(&Value::Float(5.0)));
        assert!(!question.has_choice(&Value::String("3".to_string())));
    }

    #[test]
    fn test_document_lookup_helpers() {
        let document = PatternDocument {
            questions: vec![enum_question()],
            rules: vec![
                Rule::Raw(RawRule {
                    cells: vec![Value::from("part")],
                    span: Span::default(),
                }),
                Rule::Product(ProductRule {
                    condition: None,
                    product: Some("P1".to_string()),
                    quantity: Some(Quantity::Literal(Value::Integer(1))),
                    span: Span::default(),
                }),
            ],
            issues: Vec::new(),
        };

        assert!(document.question_names().contains("support_years"));
        assert!(document.question("support_years").is_some());
        assert!(document.question("missing").is_none());

        let products: Vec<usize> = document.product_rules().map(|(i, _)| i).collect();
        assert_eq!(products, vec![1]);
        assert!(!document.is_empty());
        assert!(PatternDocument::default().is_empty());
    }

    #[test]
    fn test_violation_severity_class() {
        assert!(SchemaViolation::AmbiguousRulesKey.is_warning());
        assert!(!SchemaViolation::MissingChoices.is_warning());
    }

    #[test]
    fn test_choices_violation_class() {
        assert!(SchemaViolation::MissingChoices.is_choices_violation());
        assert!(SchemaViolation::UnexpectedChoices.is_choices_violation());
        assert!(!SchemaViolation::InvalidEnumDefault.is_choices_violation());
    }
}
