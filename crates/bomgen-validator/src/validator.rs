//! Pattern validator
//!
//! Checks a pattern document for authoring-time correctness. Diagnostics come
//! out in a fixed order: document-level issues, then each question in
//! declaration order, then each rule in declaration order. Nothing is
//! deduplicated.

use crate::diagnostic::{Diagnostic, DiagnosticKind};
use crate::locator::LineLocator;
use bomgen_core::ast::{
    IssueSubject, ProductRule, Quantity, Question, QuestionType, RawRule, Rule, SchemaIssue,
    SchemaViolation,
};
use bomgen_core::{Environment, Expression, PatternDocument, Span, Value};
use bomgen_parser::{ExpressionParser, ParseError, PatternParser, YamlParser};
use bomgen_runtime::resolver::integral_quantity;
use bomgen_runtime::Evaluator;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};

/// Validator options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidatorOptions {
    /// Warn about questions no condition or quantity references
    pub warn_unused_questions: bool,

    /// Maximum number of cells in a raw row
    pub max_raw_cells: usize,

    /// Evaluate every rule against the question defaults
    pub dry_run_defaults: bool,
}

impl Default for ValidatorOptions {
    fn default() -> Self {
        Self {
            warn_unused_questions: true,
            max_raw_cells: 9,
            dry_run_defaults: true,
        }
    }
}

/// Pattern validator
#[derive(Debug, Clone, Default)]
pub struct PatternValidator {
    options: ValidatorOptions,
}

/// Parsed expressions of one product rule
struct RuleExpressions {
    condition: Option<Result<Expression, ParseError>>,
    quantity: Option<Result<Expression, ParseError>>,
}

impl RuleExpressions {
    fn parse(rule: &ProductRule) -> Self {
        Self {
            condition: rule.condition.as_deref().map(ExpressionParser::parse),
            quantity: match &rule.quantity {
                Some(Quantity::Expression(source)) => Some(ExpressionParser::parse(source)),
                _ => None,
            },
        }
    }

    fn parsed(&self) -> impl Iterator<Item = &Expression> {
        [&self.condition, &self.quantity]
            .into_iter()
            .filter_map(|e| e.as_ref().and_then(|r| r.as_ref().ok()))
    }
}

/// State shared by the checks of one validation run
struct Context<'a> {
    document: &'a PatternDocument,
    locator: LineLocator<'a>,
    declared: BTreeSet<&'a str>,
    referenced: BTreeSet<String>,
    defaults: Environment,
    diagnostics: Vec<Diagnostic>,
}

impl PatternValidator {
    /// Create a new validator with default options
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a validator with custom options
    pub fn with_options(options: ValidatorOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ValidatorOptions {
        &self.options
    }

    /// Validate pattern text
    pub fn validate(&self, text: &str) -> Vec<Diagnostic> {
        let root = match YamlParser::parse(text) {
            Ok(root) => root,
            Err(error) => {
                let message = match &error {
                    ParseError::YamlSyntax { message, .. } => message.clone(),
                    other => other.to_string(),
                };
                return vec![Diagnostic::error(
                    Span::whole(text),
                    DiagnosticKind::YamlSyntax,
                    format!("YAML Syntax Error: {}", message),
                )];
            }
        };

        let document = PatternParser::build(&root);
        self.validate_document(text, &document)
    }

    /// Validate an already extracted document against its source text
    pub fn validate_document(&self, text: &str, document: &PatternDocument) -> Vec<Diagnostic> {
        let rule_expressions: Vec<Option<RuleExpressions>> = document
            .rules
            .iter()
            .map(|rule| rule.as_product().map(RuleExpressions::parse))
            .collect();

        let referenced = rule_expressions
            .iter()
            .flatten()
            .flat_map(RuleExpressions::parsed)
            .flat_map(Expression::free_variables)
            .collect();

        let mut ctx = Context {
            document,
            locator: LineLocator::new(text),
            declared: document.question_names(),
            referenced,
            defaults: Environment::from_defaults(document),
            diagnostics: Vec::new(),
        };

        for issue in &document.issues {
            if let IssueSubject::Document(span) = issue.subject {
                ctx.push_issue(span, issue);
            }
        }

        let mut seen = HashSet::new();
        for (index, question) in document.questions.iter().enumerate() {
            self.check_question(&mut ctx, index, question, &mut seen);
        }

        for (index, (rule, expressions)) in document.rules.iter().zip(&rule_expressions).enumerate() {
            match (rule, expressions) {
                (Rule::Product(rule), Some(expressions)) => {
                    self.check_product_rule(&mut ctx, index, rule, expressions)
                }
                (Rule::Raw(raw), _) => self.check_raw_rule(&mut ctx, index, raw),
                (Rule::Product(_), None) => {}
            }
        }

        log::debug!(
            "Validated {} questions and {} rules: {} diagnostics",
            document.questions.len(),
            document.rules.len(),
            ctx.diagnostics.len()
        );
        ctx.diagnostics
    }

    // =========================================================================
    // Questions
    // =========================================================================

    fn check_question<'a>(
        &self,
        ctx: &mut Context<'a>,
        index: usize,
        question: &'a Question,
        seen: &mut HashSet<&'a str>,
    ) {
        let name = question.name.as_deref();
        let range = ctx.locator.question(name);
        ctx.push_issues_for(IssueSubject::Question(index), range);

        let label = question.display_name();
        let schema = |violation| DiagnosticKind::SchemaViolation(violation);

        if let Some(name) = name {
            if !seen.insert(name) {
                ctx.error(
                    range,
                    schema(SchemaViolation::DuplicateName),
                    format!("Duplicate question name '{}'.", name),
                );
            }
        }

        match question.question_type {
            Some(QuestionType::Boolean) => {
                if question.choices.is_some() {
                    ctx.error(
                        range,
                        schema(SchemaViolation::UnexpectedChoices),
                        format!("Boolean question '{}' should not have choices.", label),
                    );
                }
                if let Some(default) = question.default.as_ref().filter(|d| d.as_bool().is_none()) {
                    ctx.error(
                        range,
                        schema(SchemaViolation::InvalidDefault),
                        format!(
                            "Boolean question '{}' must have a boolean default (got {} {}).",
                            label,
                            default.type_name(),
                            default
                        ),
                    );
                }
            }
            Some(QuestionType::Enum) => {
                let has_choices = question.choices.as_ref().is_some_and(|c| !c.is_empty());
                let default_listed = question
                    .default
                    .as_ref()
                    .is_some_and(|d| question.has_choice(d));

                if !has_choices || !default_listed {
                    let violation = if has_choices {
                        SchemaViolation::InvalidEnumDefault
                    } else {
                        SchemaViolation::MissingChoices
                    };
                    ctx.error(
                        range,
                        schema(violation),
                        format!(
                            "Enum question '{}' must have valid choices and a default in that list.",
                            label
                        ),
                    );
                }
            }
            Some(QuestionType::Integer) => self.check_integer_question(ctx, range, question),
            None => {}
        }

        let has_bounds = question.min.is_some() || question.max.is_some();
        if has_bounds && matches!(question.question_type, Some(QuestionType::Boolean | QuestionType::Enum)) {
            ctx.warning(
                range,
                schema(SchemaViolation::BoundsNotApplicable),
                format!(
                    "'min'/'max' only apply to integer questions; ignored on '{}'.",
                    label
                ),
            );
        }

        if self.options.warn_unused_questions {
            if let Some(name) = name.filter(|n| !ctx.referenced.contains(*n)) {
                ctx.warning(
                    range,
                    DiagnosticKind::UnusedQuestion,
                    format!("Question '{}' is not used by any rule.", name),
                );
            }
        }
    }

    fn check_integer_question(&self, ctx: &mut Context<'_>, range: Span, question: &Question) {
        let label = question.display_name();
        let schema = |violation| DiagnosticKind::SchemaViolation(violation);

        if let (Some(min), Some(max)) = (question.min, question.max) {
            if min > max {
                ctx.error(
                    range,
                    schema(SchemaViolation::InvalidBounds),
                    format!(
                        "Integer question '{}' has min {} greater than max {}.",
                        label, min, max
                    ),
                );
            }
        }

        match &question.default {
            Some(Value::Integer(default)) => {
                let below = question.min.is_some_and(|min| *default < min);
                let above = question.max.is_some_and(|max| *default > max);
                if below || above {
                    ctx.error(
                        range,
                        schema(SchemaViolation::DefaultOutOfRange),
                        format!(
                            "Default {} of integer question '{}' is outside [{}, {}].",
                            default,
                            label,
                            bound(question.min),
                            bound(question.max)
                        ),
                    );
                }
            }
            Some(other) => ctx.error(
                range,
                schema(SchemaViolation::InvalidDefault),
                format!(
                    "Integer question '{}' must have an integer default (got {} {}).",
                    label,
                    other.type_name(),
                    other
                ),
            ),
            None => {}
        }
    }

    // =========================================================================
    // Rules
    // =========================================================================

    fn check_product_rule(
        &self,
        ctx: &mut Context<'_>,
        index: usize,
        rule: &ProductRule,
        expressions: &RuleExpressions,
    ) {
        let number = index + 1;
        let range = ctx
            .locator
            .rule(rule.product.as_deref(), rule.condition.as_deref());
        ctx.push_issues_for(IssueSubject::Rule(index), range);

        let mut closed = true;

        match &expressions.condition {
            Some(Ok(condition)) => {
                closed &= ctx.check_variables(range, condition, "Condition", number);
            }
            Some(Err(error)) => {
                closed = false;
                ctx.error(
                    range,
                    DiagnosticKind::ExpressionSyntax,
                    format!("Invalid condition: {}", error),
                );
            }
            None => {}
        }

        match (&rule.quantity, &expressions.quantity) {
            (_, Some(Ok(quantity))) => {
                closed &= ctx.check_variables(range, quantity, "Quantity", number);
            }
            (_, Some(Err(error))) => {
                closed = false;
                ctx.error(
                    range,
                    DiagnosticKind::ExpressionSyntax,
                    format!("Invalid quantity: {}", error),
                );
            }
            (Some(Quantity::Literal(value)), None) => {
                if integral_quantity(value).is_none() {
                    ctx.error(
                        range,
                        DiagnosticKind::InvalidQuantity,
                        format!(
                            "Invalid quantity: quantities must be integers (got {} {}).",
                            value.type_name(),
                            value
                        ),
                    );
                }
            }
            _ => {}
        }

        if self.options.dry_run_defaults && closed {
            ctx.dry_run(range, expressions);
        }
    }

    fn check_raw_rule(&self, ctx: &mut Context<'_>, index: usize, raw: &RawRule) {
        ctx.push_issues_for(IssueSubject::Rule(index), raw.span);

        if raw.cells.len() > self.options.max_raw_cells {
            ctx.error(
                raw.span,
                DiagnosticKind::SchemaViolation(SchemaViolation::RawRowTooWide),
                format!(
                    "'raw' list has too many entries (max: {}).",
                    self.options.max_raw_cells
                ),
            );
        }
    }
}

impl Context<'_> {
    fn error(&mut self, range: Span, kind: DiagnosticKind, message: String) {
        self.diagnostics.push(Diagnostic::error(range, kind, message));
    }

    fn warning(&mut self, range: Span, kind: DiagnosticKind, message: String) {
        self.diagnostics.push(Diagnostic::warning(range, kind, message));
    }

    fn push_issue(&mut self, range: Span, issue: &SchemaIssue) {
        let kind = DiagnosticKind::SchemaViolation(issue.violation);
        if issue.violation.is_warning() {
            self.warning(range, kind, issue.message.clone());
        } else {
            self.error(range, kind, issue.message.clone());
        }
    }

    fn push_issues_for(&mut self, subject: IssueSubject, range: Span) {
        let document = self.document;
        for issue in document.issues.iter().filter(|i| i.subject == subject) {
            self.push_issue(range, issue);
        }
    }

    /// Report every free variable no question declares; true when there are none
    fn check_variables(&mut self, range: Span, expr: &Expression, what: &str, number: usize) -> bool {
        let mut closed = true;
        for variable in expr.free_variables() {
            if !self.declared.contains(variable.as_str()) {
                closed = false;
                self.error(
                    range,
                    DiagnosticKind::UndefinedVariable,
                    format!(
                        "{} uses undefined variable '{}' in rule #{}.",
                        what, variable, number
                    ),
                );
            }
        }
        closed
    }

    /// Evaluate the rule against the question defaults
    fn dry_run(&mut self, range: Span, expressions: &RuleExpressions) {
        let missing_default = expressions
            .parsed()
            .flat_map(Expression::free_variables)
            .any(|v| !self.defaults.contains(&v));
        if missing_default {
            return;
        }

        if let Some(Ok(condition)) = &expressions.condition {
            match Evaluator::evaluate_condition(condition, &self.defaults) {
                Ok(true) => {}
                Ok(false) => return,
                Err(error) => {
                    self.error(
                        range,
                        DiagnosticKind::from(&error),
                        format!("Condition fails with the default answers: {}", error),
                    );
                    return;
                }
            }
        }

        if let Some(Ok(quantity)) = &expressions.quantity {
            match Evaluator::evaluate(quantity, &self.defaults) {
                Ok(value) if integral_quantity(&value).is_none() => self.error(
                    range,
                    DiagnosticKind::InvalidQuantity,
                    format!(
                        "Quantity is not an integer with the default answers (got {} {}).",
                        value.type_name(),
                        value
                    ),
                ),
                Ok(_) => {}
                Err(error) => self.error(
                    range,
                    DiagnosticKind::from(&error),
                    format!("Quantity fails with the default answers: {}", error),
                ),
            }
        }
    }
}

fn bound(value: Option<i64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| v.to_string())
}

/// Validate pattern text with default options
pub fn validate(text: &str) -> Vec<Diagnostic> {
    PatternValidator::new().validate(text)
}
