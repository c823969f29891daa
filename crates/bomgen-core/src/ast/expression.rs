//! Expression AST nodes
//!
//! Expressions are built once by the parser and never mutated afterwards.

use super::operator::Operator;
use crate::types::Value;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Expression AST node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expression {
    /// Literal value
    Literal(Value),

    /// Named variable (a question name)
    Variable(String),

    /// Binary operation
    Binary {
        left: Box<Expression>,
        op: Operator,
        right: Box<Expression>,
    },

    /// Unary operation
    Unary {
        op: UnaryOperator,
        operand: Box<Expression>,
    },

    /// Conditional (`then_expr if condition else else_expr`)
    Conditional {
        condition: Box<Expression>,
        then_expr: Box<Expression>,
        else_expr: Box<Expression>,
    },
}

/// Unary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnaryOperator {
    /// Logical NOT (not, !)
    Not,
    /// Arithmetic negation (-)
    Negate,
}

impl Expression {
    /// Create a literal expression
    pub fn literal(value: impl Into<Value>) -> Self {
        Expression::Literal(value.into())
    }

    /// Create a variable reference
    pub fn variable(name: impl Into<String>) -> Self {
        Expression::Variable(name.into())
    }

    /// Create a binary expression
    pub fn binary(left: Expression, op: Operator, right: Expression) -> Self {
        Expression::Binary {
            left: Box::new(left),
            op,
            right: Box::new(right),
        }
    }

    /// Create a unary expression
    pub fn unary(op: UnaryOperator, operand: Expression) -> Self {
        Expression::Unary {
            op,
            operand: Box::new(operand),
        }
    }

    /// Create a conditional expression
    pub fn conditional(condition: Expression, then_expr: Expression, else_expr: Expression) -> Self {
        Expression::Conditional {
            condition: Box::new(condition),
            then_expr: Box::new(then_expr),
            else_expr: Box::new(else_expr),
        }
    }

    /// All variable names referenced anywhere in the expression, sorted
    pub fn free_variables(&self) -> BTreeSet<String> {
        let mut names = BTreeSet::new();
        self.collect_variables(&mut names);
        names
    }

    fn collect_variables(&self, names: &mut BTreeSet<String>) {
        match self {
            Expression::Literal(_) => {}
            Expression::Variable(name) => {
                names.insert(name.clone());
            }
            Expression::Binary { left, right, .. } => {
                left.collect_variables(names);
                right.collect_variables(names);
            }
            Expression::Unary { operand, .. } => operand.collect_variables(names),
            Expression::Conditional {
                condition,
                then_expr,
                else_expr,
            } => {
                condition.collect_variables(names);
                then_expr.collect_variables(names);
                else_expr.collect_variables(names);
            }
        }
    }

    fn is_compound(&self) -> bool {
        matches!(
            self,
            Expression::Binary { .. } | Expression::Conditional { .. }
        )
    }

    fn fmt_operand(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_compound() {
            write!(f, "({})", self)
        } else {
            write!(f, "{}", self)
        }
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Literal(Value::String(s)) => {
                write!(f, "\"")?;
                for c in s.chars() {
                    match c {
                        '"' => write!(f, "\\\"")?,
                        '\\' => write!(f, "\\\\")?,
                        '\n' => write!(f, "\\n")?,
                        '\t' => write!(f, "\\t")?,
                        c => write!(f, "{}", c)?,
                    }
                }
                write!(f, "\"")
            }
            Expression::Literal(value) => write!(f, "{}", value),
            Expression::Variable(name) => write!(f, "{}", name),
            Expression::Binary { left, op, right } => {
                left.fmt_operand(f)?;
                write!(f, " {} ", op)?;
                right.fmt_operand(f)
            }
            Expression::Unary { op, operand } => {
                match op {
                    UnaryOperator::Not => write!(f, "not ")?,
                    UnaryOperator::Negate => write!(f, "-")?,
                }
                operand.fmt_operand(f)
            }
            Expression::Conditional {
                condition,
                then_expr,
                else_expr,
            } => {
                then_expr.fmt_operand(f)?;
                write!(f, " if ")?;
                condition.fmt_operand(f)?;
                write!(f, " else ")?;
                else_expr.fmt_operand(f)
            }
        }
    }
}
