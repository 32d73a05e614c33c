//! List operations: `car`, `cdr`, `cons`

use crate::error::EvalError;
use crate::value::Value;

/// `(car '(1 2 3))` => 1. Errors on Nil or any non-Cons.
pub fn car(args: &[Value]) -> Result<Value, EvalError> {
    if args.len() != 1 {
        return Err(EvalError::arity_error("car", crate::error::ARITY_ONE, args.len()));
    }
    match &args[0] {
        Value::Cons(head, _) => Ok((**head).clone()),
        other => Err(EvalError::type_error("car", "list", other, 0)),
    }
}

/// `(cdr '(1 2 3))` => `(2 3)`. Errors on Nil or any non-Cons.
pub fn cdr(args: &[Value]) -> Result<Value, EvalError> {
    if args.len() != 1 {
        return Err(EvalError::arity_error("cdr", crate::error::ARITY_ONE, args.len()));
    }
    match &args[0] {
        Value::Cons(_, tail) => Ok((**tail).clone()),
        other => Err(EvalError::type_error("cdr", "list", other, 0)),
    }
}

/// `(cons 1 '(2 3))` => `(1 2 3)`. `(cons 1 2)` => the improper pair `(1 . 2)`.
pub fn cons(args: &[Value]) -> Result<Value, EvalError> {
    if args.len() != 2 {
        return Err(EvalError::arity_error("cons", crate::error::ARITY_TWO, args.len()));
    }
    Ok(Value::cons(args[0].clone(), args[1].clone()))
}
