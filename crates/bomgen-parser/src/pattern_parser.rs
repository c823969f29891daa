//! Pattern parser
//!
//! Extracts the typed Pattern model from a generic node tree. Extraction never
//! fails: every shape problem is recorded as a [`SchemaIssue`] on the returned
//! document and the offending field is left empty. Semantic checks (choices,
//! defaults, bounds, expressions) belong to the validator.

use crate::error::Result;
use crate::node::{Node, NodeKind};
use crate::yaml_parser::YamlParser;
use bomgen_core::ast::{
    IssueSubject, PatternDocument, ProductRule, Quantity, Question, QuestionType, RawRule, Rule,
    SchemaIssue, SchemaViolation,
};
use bomgen_core::Value;

/// Key holding the rules, as written by pattern authors
pub const RULES_KEY: &str = "products";

/// Accepted alias for [`RULES_KEY`]
pub const RULES_KEY_ALIAS: &str = "rules";

/// Pattern parser
pub struct PatternParser;

impl PatternParser {
    /// Parse pattern text into the Pattern model
    pub fn parse(text: &str) -> Result<PatternDocument> {
        let root = YamlParser::parse(text)?;
        Ok(Self::build(&root))
    }

    /// Build the Pattern model from a parsed node tree
    pub fn build(root: &Node) -> PatternDocument {
        let mut document = PatternDocument::default();

        match &root.kind {
            NodeKind::Null => return document,
            NodeKind::Mapping(_) => {}
            _ => {
                document.issues.push(SchemaIssue::new(
                    IssueSubject::Document(root.span),
                    SchemaViolation::NotAMapping,
                    format!(
                        "Pattern must be a mapping with 'questions' and '{}' keys (got {}).",
                        RULES_KEY,
                        root.kind_name()
                    ),
                ));
                return document;
            }
        }

        if let Some(items) = Self::section(root, "questions", &mut document.issues) {
            for (index, item) in items.iter().enumerate() {
                let question = Self::build_question(index, item, &mut document.issues);
                document.questions.push(question);
            }
        }

        let rules_key = match (root.get(RULES_KEY), root.get(RULES_KEY_ALIAS)) {
            (Some(_), Some(alias)) => {
                document.issues.push(SchemaIssue::new(
                    IssueSubject::Document(alias.span),
                    SchemaViolation::AmbiguousRulesKey,
                    format!(
                        "Both '{}' and '{}' are present; '{}' is ignored.",
                        RULES_KEY, RULES_KEY_ALIAS, RULES_KEY_ALIAS
                    ),
                ));
                RULES_KEY
            }
            (None, Some(_)) => RULES_KEY_ALIAS,
            _ => RULES_KEY,
        };

        if let Some(items) = Self::section(root, rules_key, &mut document.issues) {
            for (index, item) in items.iter().enumerate() {
                let rule = Self::build_rule(index, item, &mut document.issues);
                document.rules.push(rule);
            }
        }

        log::debug!(
            "Built pattern with {} questions, {} rules and {} issues",
            document.questions.len(),
            document.rules.len(),
            document.issues.len()
        );

        document
    }

    /// Items of an optional top-level sequence; a missing or null key is empty
    fn section<'a>(root: &'a Node, key: &str, issues: &mut Vec<SchemaIssue>) -> Option<&'a [Node]> {
        let node = root.get(key)?;
        match &node.kind {
            NodeKind::Null => None,
            NodeKind::Sequence(items) => Some(items),
            _ => {
                issues.push(SchemaIssue::new(
                    IssueSubject::Document(node.span),
                    SchemaViolation::NotASequence,
                    format!("'{}' must be a list (got {}).", key, node.kind_name()),
                ));
                None
            }
        }
    }

    // =========================================================================
    // Questions
    // =========================================================================

    fn build_question(index: usize, node: &Node, issues: &mut Vec<SchemaIssue>) -> Question {
        let subject = IssueSubject::Question(index);
        let number = index + 1;
        let mut question = Question {
            name: None,
            question_type: None,
            type_name: None,
            prompt: None,
            description: None,
            default: None,
            choices: None,
            min: None,
            max: None,
            span: node.span,
        };

        if node.as_mapping().is_none() {
            issues.push(SchemaIssue::new(
                subject,
                SchemaViolation::NotAMapping,
                format!("Question at index #{} is not a mapping (got {}).", number, node.kind_name()),
            ));
            return question;
        }

        question.name = Self::required_string(node, "name", subject, &format!("question #{}", number), issues);

        let label = match &question.name {
            Some(name) => format!("question '{}'", name),
            None => format!("question #{}", number),
        };

        question.type_name = Self::required_string(node, "type", subject, &label, issues);
        if let Some(type_name) = &question.type_name {
            match type_name.parse::<QuestionType>() {
                Ok(question_type) => question.question_type = Some(question_type),
                Err(_) => issues.push(SchemaIssue::new(
                    subject,
                    SchemaViolation::UnknownQuestionType,
                    format!(
                        "Unknown type '{}' for {} (expected integer, boolean or enum).",
                        type_name, label
                    ),
                )),
            }
        }

        question.prompt = Self::required_string(node, "prompt", subject, &label, issues);
        question.description = Self::optional_string(node, "description", subject, &label, issues);

        match node.get("default") {
            None => Self::missing(subject, "default", &label, issues),
            Some(default) if default.is_null() => Self::missing(subject, "default", &label, issues),
            Some(default) => match default.to_value() {
                Some(value) => question.default = Some(value),
                None => issues.push(SchemaIssue::new(
                    subject,
                    SchemaViolation::InvalidFieldType,
                    format!("'default' in {} must be a single value (got {}).", label, default.kind_name()),
                )),
            },
        }

        if let Some(choices) = node.get("choices").filter(|n| !n.is_null()) {
            match choices.as_sequence() {
                Some(items) => {
                    let mut values = Vec::with_capacity(items.len());
                    for item in items {
                        match item.to_value() {
                            Some(value) => values.push(value),
                            None => issues.push(SchemaIssue::new(
                                subject,
                                SchemaViolation::InvalidFieldType,
                                format!(
                                    "Choices of {} must be single values (got {}).",
                                    label,
                                    item.kind_name()
                                ),
                            )),
                        }
                    }
                    question.choices = Some(values);
                }
                None => issues.push(SchemaIssue::new(
                    subject,
                    SchemaViolation::NotASequence,
                    format!("'choices' in {} must be a list (got {}).", label, choices.kind_name()),
                )),
            }
        }

        question.min = Self::optional_integer(node, "min", subject, &label, issues);
        question.max = Self::optional_integer(node, "max", subject, &label, issues);

        question
    }

    // =========================================================================
    // Rules
    // =========================================================================

    fn build_rule(index: usize, node: &Node, issues: &mut Vec<SchemaIssue>) -> Rule {
        let subject = IssueSubject::Rule(index);
        let number = index + 1;
        let label = format!("item #{}", number);
        let mut rule = ProductRule {
            condition: None,
            product: None,
            quantity: None,
            span: node.span,
        };

        if node.as_mapping().is_none() {
            issues.push(SchemaIssue::new(
                subject,
                SchemaViolation::NotAMapping,
                format!("Item at index #{} is not a mapping (got {}).", number, node.kind_name()),
            ));
            return Rule::Product(rule);
        }

        let add = match node.get("add") {
            Some(add) if add.as_mapping().is_some() => add,
            Some(add) if !add.is_null() => {
                issues.push(SchemaIssue::new(
                    subject,
                    SchemaViolation::NotAMapping,
                    format!("Rule #{} must have an 'add' mapping (got {}).", number, add.kind_name()),
                ));
                return Rule::Product(rule);
            }
            _ => {
                issues.push(SchemaIssue::new(
                    subject,
                    SchemaViolation::MissingField,
                    format!("Rule #{} must have an 'add' mapping.", number),
                ));
                return Rule::Product(rule);
            }
        };

        if let Some(raw) = add.get("raw") {
            if node.contains_key("condition") {
                log::debug!("Ignoring condition on raw rule #{}", number);
            }
            return Rule::Raw(Self::build_raw(raw, node, subject, number, issues));
        }

        rule.condition = Self::optional_string(node, "condition", subject, &label, issues);

        match add.get("product") {
            None => Self::missing(subject, "product", &format!("'add' of {}", label), issues),
            Some(product) => match product.as_str() {
                Some(key) => rule.product = Some(key.to_string()),
                None => issues.push(SchemaIssue::new(
                    subject,
                    SchemaViolation::InvalidFieldType,
                    format!("'product' in {} must be a string (got {}).", label, product.kind_name()),
                )),
            },
        }

        match add.get("quantity") {
            None => Self::missing(subject, "quantity", &format!("'add' of {}", label), issues),
            Some(quantity) => match &quantity.kind {
                NodeKind::String(source) => rule.quantity = Some(Quantity::Expression(source.clone())),
                NodeKind::Integer(n) => rule.quantity = Some(Quantity::Literal(Value::Integer(*n))),
                NodeKind::Float(x) => rule.quantity = Some(Quantity::Literal(Value::Float(*x))),
                _ => issues.push(SchemaIssue::new(
                    subject,
                    SchemaViolation::InvalidFieldType,
                    format!(
                        "'quantity' in {} must be a string or integer (got {}).",
                        label,
                        quantity.kind_name()
                    ),
                )),
            },
        }

        Rule::Product(rule)
    }

    fn build_raw(
        raw: &Node,
        entry: &Node,
        subject: IssueSubject,
        number: usize,
        issues: &mut Vec<SchemaIssue>,
    ) -> RawRule {
        let mut cells = Vec::new();

        match raw.as_sequence() {
            Some(items) if items.is_empty() => issues.push(SchemaIssue::new(
                subject,
                SchemaViolation::EmptyRawRow,
                format!("'raw' in item #{} must have at least one element.", number),
            )),
            Some(items) => {
                for item in items {
                    match (&item.kind, item.to_value()) {
                        (NodeKind::Null, _) => cells.push(Value::String(String::new())),
                        (_, Some(value)) => cells.push(value),
                        (_, None) => issues.push(SchemaIssue::new(
                            subject,
                            SchemaViolation::InvalidFieldType,
                            format!(
                                "Cells of 'raw' in item #{} must be single values (got {}).",
                                number,
                                item.kind_name()
                            ),
                        )),
                    }
                }
            }
            None => issues.push(SchemaIssue::new(
                subject,
                SchemaViolation::NotASequence,
                format!("'raw' in item #{} must be a list (got {}).", number, raw.kind_name()),
            )),
        }

        RawRule {
            cells,
            span: entry.span,
        }
    }

    // =========================================================================
    // Field helpers
    // =========================================================================

    fn missing(subject: IssueSubject, field: &str, label: &str, issues: &mut Vec<SchemaIssue>) {
        issues.push(SchemaIssue::new(
            subject,
            SchemaViolation::MissingField,
            format!("Missing '{}' in {}.", field, label),
        ));
    }

    fn required_string(
        node: &Node,
        field: &str,
        subject: IssueSubject,
        label: &str,
        issues: &mut Vec<SchemaIssue>,
    ) -> Option<String> {
        match node.get(field) {
            None => {
                Self::missing(subject, field, label, issues);
                None
            }
            Some(value) if value.is_null() => {
                Self::missing(subject, field, label, issues);
                None
            }
            Some(_) => Self::optional_string(node, field, subject, label, issues),
        }
    }

    fn optional_string(
        node: &Node,
        field: &str,
        subject: IssueSubject,
        label: &str,
        issues: &mut Vec<SchemaIssue>,
    ) -> Option<String> {
        let value = node.get(field).filter(|n| !n.is_null())?;
        match value.as_str() {
            Some(s) => Some(s.to_string()),
            None => {
                issues.push(SchemaIssue::new(
                    subject,
                    SchemaViolation::InvalidFieldType,
                    format!("'{}' in {} must be a string (got {}).", field, label, value.kind_name()),
                ));
                None
            }
        }
    }

    fn optional_integer(
        node: &Node,
        field: &str,
        subject: IssueSubject,
        label: &str,
        issues: &mut Vec<SchemaIssue>,
    ) -> Option<i64> {
        let value = node.get(field).filter(|n| !n.is_null())?;
        match value.as_i64() {
            Some(n) => Some(n),
            None => {
                issues.push(SchemaIssue::new(
                    subject,
                    SchemaViolation::InvalidFieldType,
                    format!("'{}' in {} must be an integer (got {}).", field, label, value.kind_name()),
                ));
                None
            }
        }
    }
}
