//! Integration tests for pattern validation

use bomgen_core::ast::SchemaViolation;
use bomgen_validator::*;

const DATA_CENTER: &str = r#"questions:
  - name: num_racks
    type: integer
    min: 1
    max: 8
    prompt: "How many racks?"
    default: 2

  - name: needs_cables
    type: boolean
    prompt: "Do you need cables?"
    default: True

  - name: support_years
    type: enum
    prompt: "Support term?"
    choices: [1, 3, 5]
    default: 3

products:
  - add:
      product: "SW-48P"
      quantity: "num_racks * 2"

  - condition: "needs_cables"
    add:
      product: "CAB-3M"
      quantity: "0 if not needs_cables else num_racks * 48"

  - condition: "support_years >= 3"
    add:
      product: "SUP-3Y"
      quantity: "num_racks"

  - add:
      raw: ["Rack Rails", "Generic", "Rails", "Accessory", 4]
"#;

#[test]
fn test_well_formed_pattern_is_clean() {
    let diagnostics = validate(DATA_CENTER);
    assert!(diagnostics.is_empty(), "Unexpected diagnostics: {:?}", diagnostics);
}

#[test]
fn test_validation_is_idempotent() {
    let broken = DATA_CENTER
        .replace("default: 3", "default: 4")
        .replace("num_racks * 2", "num_rack * 2");

    let first = validate(&broken);
    let second = validate(&broken);
    assert!(!first.is_empty());
    assert_eq!(first, second);
}

#[test]
fn test_enum_default_yields_exactly_one_diagnostic() {
    let broken = DATA_CENTER.replace("default: 3", "default: 4");
    let diagnostics = validate(&broken);

    let enum_errors: Vec<_> = diagnostics
        .iter()
        .filter(|d| d.kind == DiagnosticKind::SchemaViolation(SchemaViolation::InvalidEnumDefault))
        .collect();
    assert_eq!(enum_errors.len(), 1);
    assert_eq!(
        enum_errors[0].message,
        "Enum question 'support_years' must have valid choices and a default in that list."
    );
}

#[test]
fn test_boolean_choices_yield_exactly_one_diagnostic() {
    let broken = DATA_CENTER.replace(
        "    default: True\n",
        "    default: True\n    choices: [True, False]\n",
    );
    let diagnostics = validate(&broken);

    let choice_errors: Vec<_> = diagnostics
        .iter()
        .filter(|d| d.kind.is_choices_violation())
        .collect();
    assert_eq!(choice_errors.len(), 1);
    assert_eq!(
        choice_errors[0].kind,
        DiagnosticKind::SchemaViolation(SchemaViolation::UnexpectedChoices)
    );
    assert_eq!(diagnostics.len(), 1);
}

#[test]
fn test_undefined_variable_names_the_variable() {
    let broken = DATA_CENTER.replace("num_racks * 2", "num_rack * 2");
    let diagnostics = validate(&broken);

    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].kind, DiagnosticKind::UndefinedVariable);
    assert!(diagnostics[0].message.contains("'num_rack'"));
    assert!(diagnostics[0].message.contains("rule #1"));

    // Anchored on the line holding the product key
    let line: String = broken
        .chars()
        .skip(diagnostics[0].range.start)
        .take(diagnostics[0].range.len())
        .collect();
    assert_eq!(line, "      product: \"SW-48P\"");
}

#[test]
fn test_diagnostics_follow_declaration_order() {
    let broken = DATA_CENTER
        .replace("num_racks * 48", "num_racks * cables_per_rack")
        .replace("default: 3", "default: 4")
        .replace("max: 8", "max: 0");

    let kinds: Vec<_> = validate(&broken).iter().map(|d| d.kind).collect();
    assert_eq!(
        kinds,
        vec![
            DiagnosticKind::SchemaViolation(SchemaViolation::InvalidBounds),
            DiagnosticKind::SchemaViolation(SchemaViolation::DefaultOutOfRange),
            DiagnosticKind::SchemaViolation(SchemaViolation::InvalidEnumDefault),
            DiagnosticKind::UndefinedVariable,
        ]
    );
}

#[test]
fn test_condition_syntax_error() {
    let broken = DATA_CENTER.replace("\"support_years >= 3\"", "\"support_years >=\"");
    let diagnostics = validate(&broken);

    // support_years is no longer referenced by anything that parses
    assert_eq!(diagnostics.len(), 2);
    assert_eq!(diagnostics[0].kind, DiagnosticKind::UnusedQuestion);
    assert_eq!(diagnostics[1].kind, DiagnosticKind::ExpressionSyntax);
    assert!(diagnostics[1].message.starts_with("Invalid condition: "));
}

#[test]
fn test_deeply_nested_quantity_is_a_syntax_error() {
    let nested = format!("{}1{}", "(".repeat(100), ")".repeat(100));
    let broken = DATA_CENTER.replace("num_racks * 2", &nested);
    let diagnostics = validate(&broken);

    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].kind, DiagnosticKind::ExpressionSyntax);
    assert!(diagnostics[0].message.contains("nested too deeply"));
}

#[test]
fn test_dry_run_type_mismatch() {
    let broken = DATA_CENTER.replace("\"support_years >= 3\"", "\"support_years\"");
    let diagnostics = validate(&broken);

    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].kind, DiagnosticKind::TypeMismatch);
}

#[test]
fn test_schema_issues_become_diagnostics() {
    let text = "questions:\n- name: size\n  type: decimal\n  prompt: Size?\n  default: 1\n";
    let diagnostics = validate(text);

    assert_eq!(
        diagnostics[0].kind,
        DiagnosticKind::SchemaViolation(SchemaViolation::UnknownQuestionType)
    );
    assert!(diagnostics[0].is_error());
}

#[test]
fn test_diagnostics_serialize_for_editors() {
    let text = "products:\n- add: {product: P1, quantity: \"x\"}\n";
    let diagnostics = validate(text);
    let json = serde_json::to_value(&diagnostics).unwrap();

    assert_eq!(json[0]["severity"], "error");
    assert_eq!(json[0]["kind"], "undefined_variable");
    assert_eq!(json[0]["range"]["start"], 10);
}
