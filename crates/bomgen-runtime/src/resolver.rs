//! BOM resolver
//!
//! Walks the rules of a pattern in document order and turns them into line
//! items for a concrete set of answers. Resolution is fail-fast: the first
//! error aborts the whole BOM and no partial result is returned.

use crate::bom::{Bom, LineItem};
use crate::catalog::ProductLookup;
use crate::engine::Evaluator;
use crate::error::{EvalError, ResolutionError, Result};
use bomgen_core::ast::{ProductRule, Quantity, Rule};
use bomgen_core::{Environment, Expression, PatternDocument, Value};
use bomgen_parser::ExpressionParser;

/// Resolver options
#[derive(Debug, Clone, Default)]
pub struct ResolverOptions {
    /// Product keys skipped without evaluation or lookup
    pub placeholder_products: Vec<String>,
}

/// Resolves patterns into BOMs against a product catalog
pub struct Resolver<'a> {
    catalog: &'a dyn ProductLookup,
    options: ResolverOptions,
}

impl<'a> Resolver<'a> {
    /// Create a new resolver over a catalog
    pub fn new(catalog: &'a dyn ProductLookup) -> Self {
        Self {
            catalog,
            options: ResolverOptions::default(),
        }
    }

    /// Set resolver options
    pub fn with_options(mut self, options: ResolverOptions) -> Self {
        self.options = options;
        self
    }

    /// Resolve every rule of the document against the answers
    pub fn resolve(&self, document: &PatternDocument, answers: &Environment) -> Result<Bom> {
        let mut items = Vec::with_capacity(document.rules.len());

        for (index, rule) in document.rules.iter().enumerate() {
            let number = index + 1;
            let item = match rule {
                Rule::Raw(raw) => Some(LineItem::Raw {
                    cells: raw.cells.clone(),
                }),
                Rule::Product(rule) => match self.resolve_product(number, rule, answers) {
                    Ok(item) => item,
                    Err(error) => {
                        tracing::warn!("BOM resolution failed: {}", error);
                        return Err(error);
                    }
                },
            };
            items.extend(item);
        }

        tracing::debug!(
            "Resolved {} rules into {} line items",
            document.rules.len(),
            items.len()
        );
        Ok(Bom::new(items))
    }

    fn resolve_product(
        &self,
        number: usize,
        rule: &ProductRule,
        answers: &Environment,
    ) -> Result<Option<LineItem>> {
        let key = rule.product.as_deref();

        if let Some(key) = key.filter(|key| self.is_placeholder(key)) {
            tracing::debug!("Rule #{}: skipping placeholder product '{}'", number, key);
            return Ok(None);
        }

        // A rule whose condition is false emits nothing, however incomplete it is
        if let Some(source) = &rule.condition {
            let condition = parse(number, key, source)?;
            let fires = Evaluator::evaluate_condition(&condition, answers)
                .map_err(|source| evaluation_error(number, key, source))?;
            if !fires {
                tracing::debug!(
                    "Rule #{}: condition '{}' is false, skipping '{}'",
                    number,
                    source,
                    key.unwrap_or("<missing>")
                );
                return Ok(None);
            }
        }

        let Some(key) = key else {
            return Err(ResolutionError::MalformedRule {
                rule: number,
                message: "missing 'product'".to_string(),
            });
        };

        let Some(quantity) = &rule.quantity else {
            return Err(ResolutionError::MalformedRule {
                rule: number,
                message: format!("missing 'quantity' for product '{}'", key),
            });
        };

        let quantity = Self::resolve_quantity(number, key, quantity, answers)?;

        let product = self
            .catalog
            .lookup(key)
            .ok_or_else(|| ResolutionError::ProductNotFound {
                rule: number,
                product: key.to_string(),
            })?;

        let item = LineItem::Product { product, quantity };
        if item.extended_price().is_none() {
            return Err(ResolutionError::InvalidQuantity {
                rule: number,
                product: Some(key.to_string()),
                message: format!("Quantity {} is too large to price", quantity),
            });
        }

        tracing::debug!("Rule #{}: adding {} x '{}'", number, quantity, key);
        Ok(Some(item))
    }

    fn is_placeholder(&self, key: &str) -> bool {
        self.options.placeholder_products.iter().any(|p| p == key)
    }

    fn resolve_quantity(
        number: usize,
        key: &str,
        quantity: &Quantity,
        answers: &Environment,
    ) -> Result<i64> {
        let value = match quantity {
            Quantity::Literal(value) => value.clone(),
            Quantity::Expression(source) => {
                let expr = parse(number, Some(key), source)?;
                Evaluator::evaluate(&expr, answers)
                    .map_err(|source| evaluation_error(number, Some(key), source))?
            }
        };

        integral_quantity(&value).ok_or_else(|| ResolutionError::InvalidQuantity {
            rule: number,
            product: Some(key.to_string()),
            message: format!(
                "Quantities must be integers (got {} {})",
                value.type_name(),
                value
            ),
        })
    }
}

/// Resolve a document with default options
pub fn resolve(
    document: &PatternDocument,
    answers: &Environment,
    catalog: &dyn ProductLookup,
) -> Result<Bom> {
    Resolver::new(catalog).resolve(document, answers)
}

/// Integer value of a quantity; integral floats are accepted
pub fn integral_quantity(value: &Value) -> Option<i64> {
    match value {
        Value::Integer(n) => Some(*n),
        Value::Float(x) if x.is_finite() && x.fract() == 0.0 && x.abs() < i64::MAX as f64 => {
            Some(*x as i64)
        }
        _ => None,
    }
}

fn parse(number: usize, key: Option<&str>, source: &str) -> Result<Expression> {
    ExpressionParser::parse(source).map_err(|source| ResolutionError::Expression {
        rule: number,
        product: key.map(str::to_string),
        source,
    })
}

fn evaluation_error(number: usize, key: Option<&str>, source: EvalError) -> ResolutionError {
    ResolutionError::Evaluation {
        rule: number,
        product: key.map(str::to_string),
        source,
    }
}
