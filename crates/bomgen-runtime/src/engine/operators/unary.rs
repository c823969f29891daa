//! Unary operator execution

use crate::error::{EvalError, EvalResult};
use bomgen_core::ast::UnaryOperator;
use bomgen_core::Value;

/// Execute a unary operation
pub(crate) fn execute_unary_op(operand: &Value, op: UnaryOperator) -> EvalResult<Value> {
    match (op, operand) {
        (UnaryOperator::Not, Value::Boolean(b)) => Ok(Value::Boolean(!b)),
        (UnaryOperator::Negate, Value::Integer(n)) => n
            .checked_neg()
            .map(Value::Integer)
            .ok_or_else(|| EvalError::Overflow(format!("-({})", n))),
        (UnaryOperator::Negate, Value::Float(x)) => Ok(Value::Float(-x)),
        (UnaryOperator::Not, _) => Err(EvalError::TypeMismatch(format!(
            "'not' requires a boolean, got {}",
            operand.type_name()
        ))),
        (UnaryOperator::Negate, _) => Err(EvalError::TypeMismatch(format!(
            "Cannot negate {}",
            operand.type_name()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unary_ops() {
        assert_eq!(
            execute_unary_op(&Value::Boolean(true), UnaryOperator::Not),
            Ok(Value::Boolean(false))
        );
        assert_eq!(
            execute_unary_op(&Value::Integer(3), UnaryOperator::Negate),
            Ok(Value::Integer(-3))
        );
        assert_eq!(
            execute_unary_op(&Value::Float(1.5), UnaryOperator::Negate),
            Ok(Value::Float(-1.5))
        );
    }

    #[test]
    fn test_unary_type_errors() {
        assert!(execute_unary_op(&Value::Integer(1), UnaryOperator::Not).is_err());
        assert!(execute_unary_op(&Value::from("x"), UnaryOperator::Negate).is_err());
        assert!(matches!(
            execute_unary_op(&Value::Integer(i64::MIN), UnaryOperator::Negate),
            Err(EvalError::Overflow(_))
        ));
    }
}
