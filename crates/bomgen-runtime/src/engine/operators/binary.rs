//! Arithmetic operator execution

use crate::error::{EvalError, EvalResult};
use bomgen_core::ast::Operator;
use bomgen_core::Value;

/// Execute an arithmetic operation
pub(crate) fn execute_binary_op(left: &Value, op: Operator, right: &Value) -> EvalResult<Value> {
    match (left, right) {
        (Value::Integer(l), Value::Integer(r)) => integer_op(*l, op, *r),
        (Value::Integer(_) | Value::Float(_), Value::Integer(_) | Value::Float(_)) => {
            let (l, r) = (as_float(left), as_float(right));
            float_op(l, op, r)
        }
        _ => Err(EvalError::TypeMismatch(format!(
            "Cannot apply '{}' to {} and {}",
            op,
            left.type_name(),
            right.type_name()
        ))),
    }
}

fn as_float(value: &Value) -> f64 {
    value.as_f64().unwrap_or(f64::NAN)
}

fn integer_op(l: i64, op: Operator, r: i64) -> EvalResult<Value> {
    let result = match op {
        Operator::Add => l.checked_add(r),
        Operator::Sub => l.checked_sub(r),
        Operator::Mul => l.checked_mul(r),
        Operator::Div => return float_op(l as f64, op, r as f64),
        Operator::Mod => {
            if r == 0 {
                return Err(EvalError::DivideByZero);
            }
            // Floored modulo: the result takes the sign of the divisor
            l.checked_rem(r)
                .map(|m| if m != 0 && (m < 0) != (r < 0) { m + r } else { m })
        }
        _ => return Err(not_arithmetic(op)),
    };

    result
        .map(Value::Integer)
        .ok_or_else(|| EvalError::Overflow(format!("{} {} {}", l, op, r)))
}

fn float_op(l: f64, op: Operator, r: f64) -> EvalResult<Value> {
    let result = match op {
        Operator::Add => l + r,
        Operator::Sub => l - r,
        Operator::Mul => l * r,
        Operator::Div => {
            if r == 0.0 {
                return Err(EvalError::DivideByZero);
            }
            l / r
        }
        Operator::Mod => {
            if r == 0.0 {
                return Err(EvalError::DivideByZero);
            }
            l - r * (l / r).floor()
        }
        _ => return Err(not_arithmetic(op)),
    };

    if result.is_finite() {
        Ok(Value::Float(result))
    } else {
        Err(EvalError::Overflow(format!("{} {} {}", l, op, r)))
    }
}

fn not_arithmetic(op: Operator) -> EvalError {
    EvalError::TypeMismatch(format!("'{}' is not an arithmetic operator", op))
}
