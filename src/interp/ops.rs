//! Binary operators over runtime values
//!
//! Each operator tries a fixed sequence of type-pair rules and falls back to a
//! placeholder when none applies:
//!
//! 1. both `Number`: float arithmetic
//! 2. both `Int`: checked `i32` arithmetic, promoted to `Number` on overflow
//! 3. `add` only: string concatenation when either side is a `String`
//! 4. both `Boolean`: coerced to `Int` 0/1, then rule 2
//! 5. otherwise `NaN` (`greater_than`: `Undefined`)

use super::value::Value;
use crate::diagnostics::RuntimeError;

type IntOp = fn(i32, i32) -> Option<i32>;
type FloatOp = fn(f64, f64) -> f64;

fn bools_as_ints(left: &Value, right: &Value) -> Option<(i32, i32)> {
    match (left, right) {
        (Value::Boolean(a), Value::Boolean(b)) => Some((i32::from(*a), i32::from(*b))),
        _ => None,
    }
}

fn int_arith(a: i32, b: i32, checked: IntOp, wide: FloatOp) -> Value {
    match checked(a, b) {
        Some(n) => Value::Int(n),
        None => Value::Number(wide(f64::from(a), f64::from(b))),
    }
}

fn numeric(left: &Value, right: &Value, checked: IntOp, float: FloatOp) -> Value {
    match (left, right) {
        (Value::Number(a), Value::Number(b)) => Value::Number(float(*a, *b)),
        (Value::Int(a), Value::Int(b)) => int_arith(*a, *b, checked, float),
        _ => match bools_as_ints(left, right) {
            Some((a, b)) => int_arith(a, b, checked, float),
            None => Value::nan(),
        },
    }
}

pub fn add(left: &Value, right: &Value) -> Value {
    match (left, right) {
        (Value::Number(_), Value::Number(_)) | (Value::Int(_), Value::Int(_)) => {
            numeric(left, right, i32::checked_add, |a, b| a + b)
        }
        (Value::String(a), Value::String(b)) => Value::String(format!("{}{}", a, b)),
        (Value::String(_), _) | (_, Value::String(_)) => {
            Value::String(format!("{}{}", left, right))
        }
        _ => numeric(left, right, i32::checked_add, |a, b| a + b),
    }
}

pub fn subtract(left: &Value, right: &Value) -> Value {
    numeric(left, right, i32::checked_sub, |a, b| a - b)
}

pub fn multiply(left: &Value, right: &Value) -> Value {
    numeric(left, right, i32::checked_mul, |a, b| a * b)
}

/// Integer division truncates; an integer zero divisor is a fault
pub fn divide(left: &Value, right: &Value) -> Result<Value, RuntimeError> {
    let ints = match (left, right) {
        (Value::Number(a), Value::Number(b)) => return Ok(Value::Number(a / b)),
        (Value::Int(a), Value::Int(b)) => Some((*a, *b)),
        _ => bools_as_ints(left, right),
    };

    match ints {
        Some((_, 0)) => Err(RuntimeError::DivisionByZero),
        Some((a, b)) => Ok(int_arith(a, b, i32::checked_div, |a, b| a / b)),
        None => Ok(Value::nan()),
    }
}

pub fn greater_than(left: &Value, right: &Value) -> Result<Value, RuntimeError> {
    match (left, right) {
        (Value::Number(a), Value::Number(b)) => Ok(Value::Boolean(a > b)),
        (Value::Int(a), Value::Int(b)) => Ok(Value::Boolean(a > b)),
        (Value::Boolean(a), Value::Boolean(b)) => Ok(Value::Boolean(a > b)),
        (Value::String(_), _) | (_, Value::String(_)) => Err(RuntimeError::StringComparison),
        _ => Ok(Value::Undefined),
    }
}

/// Add or subtract one in the operand's own numeric kind
pub fn step(value: &Value, delta: i32) -> Value {
    match value {
        Value::Number(n) => Value::Number(n + f64::from(delta)),
        Value::Int(n) => int_arith(*n, delta, i32::checked_add, |a, b| a + b),
        Value::Boolean(b) => int_arith(i32::from(*b), delta, i32::checked_add, |a, b| a + b),
        _ => Value::nan(),
    }
}
