//! Expression evaluator
//!
//! Evaluates an [`Expression`] against an [`Environment`]. Evaluation is pure:
//! the same expression and environment always produce the same value or the
//! same error.

use super::operators::{execute_binary_op, execute_compare, execute_unary_op};
use crate::error::{EvalError, EvalResult};
use bomgen_core::ast::Operator;
use bomgen_core::{Environment, Expression, Value};

/// Expression evaluator
pub struct Evaluator;

impl Evaluator {
    /// Evaluate an expression to a value
    pub fn evaluate(expr: &Expression, env: &Environment) -> EvalResult<Value> {
        match expr {
            Expression::Literal(value) => Ok(value.clone()),

            Expression::Variable(name) => env
                .get(name)
                .cloned()
                .ok_or_else(|| EvalError::UndefinedVariable(name.clone())),

            Expression::Unary { op, operand } => {
                let value = Self::evaluate(operand, env)?;
                execute_unary_op(&value, *op)
            }

            Expression::Binary { left, op, right } if op.is_logical() => {
                Self::evaluate_logical(left, *op, right, env)
            }

            Expression::Binary { left, op, right } => {
                let left = Self::evaluate(left, env)?;
                let right = Self::evaluate(right, env)?;

                if op.is_comparison() {
                    execute_compare(&left, *op, &right).map(Value::Boolean)
                } else {
                    execute_binary_op(&left, *op, &right)
                }
            }

            Expression::Conditional {
                condition,
                then_expr,
                else_expr,
            } => {
                if Self::evaluate_condition(condition, env)? {
                    Self::evaluate(then_expr, env)
                } else {
                    Self::evaluate(else_expr, env)
                }
            }
        }
    }

    /// Evaluate an expression that must produce a boolean
    pub fn evaluate_condition(expr: &Expression, env: &Environment) -> EvalResult<bool> {
        let value = Self::evaluate(expr, env)?;
        value.as_bool().ok_or_else(|| {
            EvalError::TypeMismatch(format!(
                "Condition must evaluate to a boolean, got {} ({})",
                value.type_name(),
                value
            ))
        })
    }

    /// `and` / `or` with short-circuit
    fn evaluate_logical(
        left: &Expression,
        op: Operator,
        right: &Expression,
        env: &Environment,
    ) -> EvalResult<Value> {
        let left = Self::logical_operand(left, op, env)?;

        let result = match (op, left) {
            (Operator::And, false) => false,
            (Operator::Or, true) => true,
            _ => Self::logical_operand(right, op, env)?,
        };

        Ok(Value::Boolean(result))
    }

    fn logical_operand(expr: &Expression, op: Operator, env: &Environment) -> EvalResult<bool> {
        let value = Self::evaluate(expr, env)?;
        value.as_bool().ok_or_else(|| {
            EvalError::TypeMismatch(format!(
                "'{}' requires boolean operands, got {}",
                op,
                value.type_name()
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bomgen_parser::ExpressionParser;

    fn env() -> Environment {
        [
            ("num_cables", Value::Integer(3)),
            ("needs_cables", Value::Boolean(true)),
            ("ratio", Value::Float(0.5)),
            ("tier", Value::from("gold")),
        ]
        .into_iter()
        .collect()
    }

    fn eval(source: &str) -> EvalResult<Value> {
        let expr = ExpressionParser::parse(source).unwrap();
        Evaluator::evaluate(&expr, &env())
    }

    #[test]
    fn test_arithmetic_with_variables() {
        assert_eq!(eval("num_cables * 2"), Ok(Value::Integer(6)));
        assert_eq!(eval("num_cables * 2 + 1"), Ok(Value::Integer(7)));
        assert_eq!(eval("(num_cables + 1) * 2"), Ok(Value::Integer(8)));
        assert_eq!(eval("num_cables * ratio"), Ok(Value::Float(1.5)));
        assert_eq!(eval("-num_cables"), Ok(Value::Integer(-3)));
    }

    #[test]
    fn test_comparisons() {
        assert_eq!(eval("needs_cables == True"), Ok(Value::Boolean(true)));
        assert_eq!(eval("tier == 'gold'"), Ok(Value::Boolean(true)));
        assert_eq!(eval("tier == 1"), Ok(Value::Boolean(false)));
        assert_eq!(eval("tier != 1"), Ok(Value::Boolean(true)));
        assert_eq!(eval("num_cables >= 3"), Ok(Value::Boolean(true)));
    }

    #[test]
    fn test_undefined_variable_is_named() {
        assert_eq!(
            eval("num_racks * 2"),
            Err(EvalError::UndefinedVariable("num_racks".to_string()))
        );
    }

    #[test]
    fn test_type_mismatch() {
        assert!(matches!(eval("tier * 2"), Err(EvalError::TypeMismatch(_))));
        assert!(matches!(eval("tier < 2"), Err(EvalError::TypeMismatch(_))));
        assert!(matches!(eval("num_cables and needs_cables"), Err(EvalError::TypeMismatch(_))));
    }

    #[test]
    fn test_divide_by_zero() {
        assert_eq!(eval("num_cables / (num_cables - 3)"), Err(EvalError::DivideByZero));
    }

    #[test]
    fn test_short_circuit() {
        // The right operand would fail if it were evaluated
        assert_eq!(eval("not needs_cables and missing > 1"), Ok(Value::Boolean(false)));
        assert_eq!(eval("needs_cables or missing > 1"), Ok(Value::Boolean(true)));
        assert!(eval("needs_cables and missing > 1").is_err());
    }

    #[test]
    fn test_conditional() {
        assert_eq!(
            eval("num_cables * 2 if needs_cables else 0"),
            Ok(Value::Integer(6))
        );
        assert_eq!(
            eval("0 if not needs_cables else num_cables * 2"),
            Ok(Value::Integer(6))
        );
        assert!(matches!(
            eval("1 if num_cables else 2"),
            Err(EvalError::TypeMismatch(_))
        ));
    }

    #[test]
    fn test_evaluate_condition_requires_boolean() {
        let expr = ExpressionParser::parse("num_cables").unwrap();
        assert!(matches!(
            Evaluator::evaluate_condition(&expr, &env()),
            Err(EvalError::TypeMismatch(_))
        ));

        let expr = ExpressionParser::parse("num_cables > 1 and needs_cables").unwrap();
        assert_eq!(Evaluator::evaluate_condition(&expr, &env()), Ok(true));
    }

    #[test]
    fn test_evaluation_is_deterministic() {
        let expr = ExpressionParser::parse("num_cables * 2 % 4 + ratio").unwrap();
        let first = Evaluator::evaluate(&expr, &env());
        let second = Evaluator::evaluate(&expr, &env());
        assert_eq!(first, second);
        assert_eq!(first, Ok(Value::Float(2.5)));
    }
}
