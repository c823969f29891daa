//! Comparison operator execution

use crate::error::{EvalError, EvalResult};
use bomgen_core::ast::Operator;
use bomgen_core::Value;
use std::cmp::Ordering;

/// Execute a comparison operation
pub(crate) fn execute_compare(left: &Value, op: Operator, right: &Value) -> EvalResult<bool> {
    match op {
        Operator::Eq => Ok(left.equals(right)),
        Operator::Ne => Ok(!left.equals(right)),
        Operator::Gt | Operator::Ge | Operator::Lt | Operator::Le => {
            let ordering = numeric_order(left, right).ok_or_else(|| {
                EvalError::TypeMismatch(format!(
                    "Cannot compare {} and {} with '{}'",
                    left.type_name(),
                    right.type_name(),
                    op
                ))
            })?;

            Ok(match op {
                Operator::Gt => ordering == Ordering::Greater,
                Operator::Ge => ordering != Ordering::Less,
                Operator::Lt => ordering == Ordering::Less,
                _ => ordering != Ordering::Greater,
            })
        }
        _ => Err(EvalError::TypeMismatch(format!(
            "'{}' is not a comparison operator",
            op
        ))),
    }
}

fn numeric_order(left: &Value, right: &Value) -> Option<Ordering> {
    match (left, right) {
        (Value::Integer(l), Value::Integer(r)) => Some(l.cmp(r)),
        _ => left.as_f64()?.partial_cmp(&right.as_f64()?),
    }
}
