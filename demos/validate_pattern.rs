//! Pattern validation example
//!
//! This example demonstrates:
//! - Validating pattern text with a PatternEngine
//! - Printing diagnostics with their codes and positions
//! - Serializing diagnostics for an editor
//!
//! Usage: cargo run --example validate_pattern [PATTERN_FILE]

use anyhow::{Context, Result};
use bomgen_sdk::{PatternEngineBuilder, Severity};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("bomgen_sdk=info,bomgen_runtime=info")),
        )
        .init();

    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "demos/patterns/broken.yaml".to_string());
    let text = std::fs::read_to_string(&path).with_context(|| format!("Failed to read {}", path))?;

    println!("=== Validating {} ===\n", path);

    let engine = PatternEngineBuilder::new().build();
    let diagnostics = engine.validate(&text);

    if diagnostics.is_empty() {
        println!("No problems found");
        return Ok(());
    }

    for diagnostic in &diagnostics {
        let (line, column) = line_and_column(&text, diagnostic.range.start);
        let label = match diagnostic.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        println!(
            "{}:{}:{}: {}[{}]: {}",
            path,
            line,
            column,
            label,
            diagnostic.code(),
            diagnostic.message
        );
    }

    let errors = diagnostics.iter().filter(|d| d.is_error()).count();
    println!(
        "\n{} errors, {} warnings",
        errors,
        diagnostics.len() - errors
    );

    println!("\nAs JSON:");
    println!("{}", serde_json::to_string_pretty(&diagnostics)?);

    Ok(())
}

/// 1-based line and column of a character offset
fn line_and_column(text: &str, offset: usize) -> (usize, usize) {
    let mut line = 1;
    let mut column = 1;
    for c in text.chars().take(offset) {
        if c == '\n' {
            line += 1;
            column = 1;
        } else {
            column += 1;
        }
    }
    (line, column)
}
