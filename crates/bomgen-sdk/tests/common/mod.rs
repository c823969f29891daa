//! Common test utilities for SDK integration tests

#![allow(dead_code)]

use bomgen_sdk::{Environment, InMemoryCatalog, PatternEngine, PatternEngineBuilder, Value};

/// Switch rack pattern used across the SDK tests
pub const RACK_PATTERN: &str = r#"questions:
  - name: num_racks
    type: integer
    min: 1
    max: 4
    prompt: "How many racks?"
    default: 2

  - name: needs_cables
    type: boolean
    prompt: "Do you need cables?"
    default: false

  - name: support_tier
    type: enum
    prompt: "Support tier?"
    choices: ["basic", "premium"]
    default: "basic"

products:
  - add:
      product: "SW-48P"
      quantity: "num_racks * 2"

  - condition: "needs_cables == True"
    add:
      product: "CAB-3M"
      quantity: "num_racks * 24"

  - condition: "support_tier == 'premium'"
    add:
      product: "SUP-PREM"
      quantity: 1

  - add:
      product: "example"
      quantity: 1

  - add:
      raw: ["Installation", "Services", "On-site install", "Service", 1]
"#;

/// Catalog holding every product of the rack pattern
pub fn catalog() -> InMemoryCatalog {
    InMemoryCatalog::from_yaml_str(
        r#"
- part: SW-48P
  manufacturer: Acme
  description: 48-port switch
  device_role: Access
  list_price: 1000
  discount: 0.2
- part: CAB-3M
  manufacturer: Acme
  description: 3m patch cable
  list_price: 5
- part: SUP-PREM
  manufacturer: Acme
  description: Premium support
  list_price: 250
"#,
    )
    .expect("test catalog is valid")
}

/// Answers for the rack pattern
pub fn answers(num_racks: i64, needs_cables: bool, support_tier: &str) -> Environment {
    [
        ("num_racks", Value::Integer(num_racks)),
        ("needs_cables", Value::Boolean(needs_cables)),
        ("support_tier", Value::String(support_tier.to_string())),
    ]
    .into_iter()
    .collect()
}

/// Engine that skips the `example` placeholder product
pub fn engine() -> PatternEngine {
    PatternEngineBuilder::new()
        .add_placeholder_product("example")
        .build()
}
