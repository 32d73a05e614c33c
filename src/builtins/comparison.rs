//! Comparison operations: `= > <`
//!
//! All three are N-ary and chained: `(> a b c)` means `a > b && b > c`.

use crate::error::EvalError;
use crate::value::Value;

fn values_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Integer(x), Value::Integer(y)) => x == y,
        (Value::Float(x), Value::Float(y)) => x == y,
        (Value::Integer(x), Value::Float(y)) | (Value::Float(y), Value::Integer(x)) => {
            *x as f64 == *y
        }
        (Value::Str(x), Value::Str(y)) => x == y,
        (Value::Bool(x), Value::Bool(y)) => x == y,
        (Value::Nil, Value::Nil) => true,
        _ => false,
    }
}

/// `(= a b c …)`, at least 2 args, true if all adjacent pairs are equal
/// under cross-variant numeric comparison.
pub fn eq(args: &[Value]) -> Result<Value, EvalError> {
    if args.len() < 2 {
        return Err(EvalError::arity_error("=", crate::error::ARITY_AT_LEAST_TWO, args.len()));
    }
    Ok(Value::Bool(args.windows(2).all(|w| values_equal(&w[0], &w[1]))))
}

fn as_f64(function: &str, v: &Value, position: usize) -> Result<f64, EvalError> {
    match v {
        Value::Integer(n) => Ok(*n as f64),
        Value::Float(n) => Ok(*n),
        other => Err(EvalError::type_error(function, "number", other, position)),
    }
}

fn chained(function: &str, args: &[Value], cmp: impl Fn(f64, f64) -> bool) -> Result<Value, EvalError> {
    if args.len() < 2 {
        return Err(EvalError::arity_error(function, crate::error::ARITY_AT_LEAST_TWO, args.len()));
    }
    let numbers = args
        .iter()
        .enumerate()
        .map(|(i, v)| as_f64(function, v, i))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Value::Bool(numbers.windows(2).all(|w| cmp(w[0], w[1]))))
}

/// `(> a b c …)`, chained strictly-decreasing.
pub fn gt(args: &[Value]) -> Result<Value, EvalError> {
    chained(">", args, |a, b| a > b)
}

/// `(< a b c …)`, chained strictly-increasing.
pub fn lt(args: &[Value]) -> Result<Value, EvalError> {
    chained("<", args, |a, b| a < b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn eq_compares_across_integer_and_float() {
        assert!(matches!(eq(&[Value::Integer(1), Value::Float(1.0)]).unwrap(), Value::Bool(true)));
    }

    #[test]
    fn eq_is_false_across_incompatible_variants() {
        assert!(matches!(
            eq(&[Value::Integer(1), Value::string("1")]).unwrap(),
            Value::Bool(false)
        ));
    }

    #[test]
    fn eq_chains_across_more_than_two_args() {
        let all_same = eq(&[Value::Integer(1), Value::Integer(1), Value::Integer(1)]).unwrap();
        assert!(matches!(all_same, Value::Bool(true)));

        let not_all_same = eq(&[Value::Integer(1), Value::Integer(1), Value::Integer(2)]).unwrap();
        assert!(matches!(not_all_same, Value::Bool(false)));
    }

    #[test]
    fn gt_chains_strictly_decreasing() {
        assert!(matches!(
            gt(&[Value::Integer(3), Value::Integer(2), Value::Integer(1)]).unwrap(),
            Value::Bool(true)
        ));
        assert!(matches!(
            gt(&[Value::Integer(3), Value::Integer(3)]).unwrap(),
            Value::Bool(false)
        ));
    }

    #[test]
    fn lt_rejects_non_numeric_operands() {
        assert!(lt(&[Value::string("a"), Value::Integer(1)]).is_err());
    }

    #[test]
    fn comparisons_require_at_least_two_args() {
        assert!(eq(&[Value::Integer(1)]).is_err());
        assert!(gt(&[Value::Integer(1)]).is_err());
    }
}
