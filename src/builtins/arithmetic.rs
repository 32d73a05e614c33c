//! Arithmetic operations: `+ - * / % ^`
//!
//! `+` and `*` fold to Integer unless any operand is Float, in which case
//! the whole reduction runs in `f64`. `/` always returns Float. `%` is
//! strictly binary-Integer. `^` always returns Float via `f64::powf`.

use crate::error::{EvalError, LispError, RuntimeError};
use crate::value::Value;

fn as_f64(function: &str, v: &Value, position: usize) -> Result<f64, EvalError> {
    match v {
        Value::Integer(n) => Ok(*n as f64),
        Value::Float(n) => Ok(*n),
        other => Err(EvalError::type_error(function, "number", other, position)),
    }
}

fn as_i64(function: &str, v: &Value, position: usize) -> Result<i64, EvalError> {
    match v {
        Value::Integer(n) => Ok(*n),
        other => Err(EvalError::type_error(function, "integer", other, position)),
    }
}

fn any_float(args: &[Value]) -> bool {
    args.iter().any(|v| matches!(v, Value::Float(_)))
}

/// `(+ 1 2 3)` => 6. `(+)` => 0. Float-contaminated sums promote to Float.
pub fn add(args: &[Value]) -> Result<Value, EvalError> {
    if any_float(args) {
        let mut sum = 0.0;
        for (i, arg) in args.iter().enumerate() {
            sum += as_f64("+", arg, i)?;
        }
        Ok(Value::Float(sum))
    } else {
        let mut sum: i64 = 0;
        for (i, arg) in args.iter().enumerate() {
            sum = sum.wrapping_add(as_i64("+", arg, i)?);
        }
        Ok(Value::Integer(sum))
    }
}

/// `(- 10 3 2)` => 5. `(- 5)` => -5. Requires at least one argument.
pub fn sub(args: &[Value]) -> Result<Value, EvalError> {
    if args.is_empty() {
        return Err(EvalError::arity_error("-", crate::error::ARITY_AT_LEAST_ONE, 0));
    }
    if any_float(args) {
        let first = as_f64("-", &args[0], 0)?;
        if args.len() == 1 {
            return Ok(Value::Float(-first));
        }
        let mut result = first;
        for (i, arg) in args[1..].iter().enumerate() {
            result -= as_f64("-", arg, i + 1)?;
        }
        Ok(Value::Float(result))
    } else {
        let first = as_i64("-", &args[0], 0)?;
        if args.len() == 1 {
            return Ok(Value::Integer(first.wrapping_neg()));
        }
        let mut result = first;
        for (i, arg) in args[1..].iter().enumerate() {
            result = result.wrapping_sub(as_i64("-", arg, i + 1)?);
        }
        Ok(Value::Integer(result))
    }
}

/// `(* 2 3 4)` => 24. `(*)` => 1.
pub fn mul(args: &[Value]) -> Result<Value, EvalError> {
    if any_float(args) {
        let mut product = 1.0;
        for (i, arg) in args.iter().enumerate() {
            product *= as_f64("*", arg, i)?;
        }
        Ok(Value::Float(product))
    } else {
        let mut product: i64 = 1;
        for (i, arg) in args.iter().enumerate() {
            product = product.wrapping_mul(as_i64("*", arg, i)?);
        }
        Ok(Value::Integer(product))
    }
}

/// `(/ 20 4)` => 5.0. `(/ 5)` => 0.2. Always returns Float. Division by
/// zero is a `RuntimeError`, not an `EvalError` — it depends on the runtime
/// value of an argument, not its static shape.
pub fn div(args: &[Value]) -> Result<Value, LispError> {
    if args.is_empty() {
        return Err(EvalError::arity_error("/", crate::error::ARITY_AT_LEAST_ONE, 0).into());
    }
    let first = as_f64("/", &args[0], 0)?;
    if args.len() == 1 {
        if first == 0.0 {
            return Err(RuntimeError::new("/", "Division by zero").into());
        }
        return Ok(Value::Float(1.0 / first));
    }
    let mut result = first;
    for (i, arg) in args[1..].iter().enumerate() {
        let divisor = as_f64("/", arg, i + 1)?;
        if divisor == 0.0 {
            return Err(RuntimeError::new("/", "Division by zero").into());
        }
        result /= divisor;
    }
    Ok(Value::Float(result))
}

/// `(% 17 5)` => 2. Exactly two Integer arguments. Modulo by zero is a
/// `RuntimeError`, mirroring `div`.
pub fn modulo(args: &[Value]) -> Result<Value, LispError> {
    if args.len() != 2 {
        return Err(EvalError::arity_error("%", crate::error::ARITY_TWO, args.len()).into());
    }
    let a = as_i64("%", &args[0], 0)?;
    let b = as_i64("%", &args[1], 1)?;
    if b == 0 {
        return Err(RuntimeError::new("%", "Modulo by zero").into());
    }
    Ok(Value::Integer(a % b))
}

/// `(^ 2 10)` => 1024.0. Always returns Float via `f64::powf`.
pub fn pow(args: &[Value]) -> Result<Value, EvalError> {
    if args.len() != 2 {
        return Err(EvalError::arity_error("^", crate::error::ARITY_TWO, args.len()));
    }
    let base = as_f64("^", &args[0], 0)?;
    let exp = as_f64("^", &args[1], 1)?;
    Ok(Value::Float(base.powf(exp)))
}
