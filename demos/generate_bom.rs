//! BOM generation example
//!
//! This example demonstrates:
//! - Loading a product catalog from YAML
//! - Listing the questions of a pattern
//! - Resolving the pattern into a priced bill of materials
//!
//! Usage: cargo run --example generate_bom [name=value ...]
//!
//! Unanswered questions fall back to their defaults.

use anyhow::{bail, Context, Result};
use bomgen_runtime::BOM_HEADERS;
use bomgen_sdk::{Environment, InMemoryCatalog, PatternEngineBuilder, Value};
use tracing_subscriber::EnvFilter;

const PATTERN_FILE: &str = "demos/patterns/data_center.yaml";
const CATALOG_FILE: &str = "demos/patterns/catalog.yaml";

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("bomgen_sdk=info,bomgen_runtime=info")),
        )
        .init();

    println!("=== BOM Generation Example ===\n");

    let pattern = std::fs::read_to_string(PATTERN_FILE)
        .with_context(|| format!("Failed to read {}", PATTERN_FILE))?;
    let catalog_text = std::fs::read_to_string(CATALOG_FILE)
        .with_context(|| format!("Failed to read {}", CATALOG_FILE))?;
    let catalog = InMemoryCatalog::from_yaml_str(&catalog_text)?;

    let engine = PatternEngineBuilder::new()
        .fill_missing_answers(true)
        .add_placeholder_product("example")
        .build();

    let diagnostics = engine.validate(&pattern);
    if diagnostics.iter().any(|d| d.is_error()) {
        for diagnostic in &diagnostics {
            println!("  [{}] {}", diagnostic.code(), diagnostic.message);
        }
        bail!("{} has validation errors", PATTERN_FILE);
    }

    println!("Questions:");
    for question in engine.questions(&pattern)? {
        let default = question
            .default
            .as_ref()
            .map(ToString::to_string)
            .unwrap_or_default();
        println!(
            "  {} ({}): {} [default: {}]",
            question.display_name(),
            question.type_name.as_deref().unwrap_or("?"),
            question.prompt.as_deref().unwrap_or(""),
            default
        );
    }

    let answers = std::env::args()
        .skip(1)
        .map(|arg| parse_answer(&arg))
        .collect::<Result<Environment>>()?;

    let bom = engine.resolve(&pattern, &answers, &catalog)?;

    println!("\nBill of materials ({} line items):\n", bom.len());
    println!("{}", BOM_HEADERS.join(" | "));
    for row in bom.rows() {
        println!("{}", row.join(" | "));
    }
    println!("{}", bom.subtotal_row().join(" | "));

    Ok(())
}

/// Parse a `name=value` argument; the value is read as a boolean, number or string
fn parse_answer(arg: &str) -> Result<(String, Value)> {
    let Some((name, raw)) = arg.split_once('=') else {
        bail!("Expected name=value, got '{}'", arg);
    };

    let value = match raw {
        "true" | "True" => Value::Boolean(true),
        "false" | "False" => Value::Boolean(false),
        _ => raw
            .parse::<i64>()
            .map(Value::Integer)
            .or_else(|_| raw.parse::<f64>().map(Value::Float))
            .unwrap_or_else(|_| Value::String(raw.to_string())),
    };

    Ok((name.trim().to_string(), value))
}
