//! Type reflection operations: `type-of`, `symbol`

use crate::error::EvalError;
use crate::value::Value;

/// `(type-of '(1 2 3))` => `"list"`.
pub fn type_of(args: &[Value]) -> Result<Value, EvalError> {
    if args.len() != 1 {
        return Err(EvalError::arity_error("type-of", crate::error::ARITY_ONE, args.len()));
    }
    Ok(Value::string(args[0].type_name()))
}

/// `(symbol "x")` => the Symbol `x`. Argument must evaluate to Str.
pub fn symbol(args: &[Value]) -> Result<Value, EvalError> {
    if args.len() != 1 {
        return Err(EvalError::arity_error("symbol", crate::error::ARITY_ONE, args.len()));
    }
    match &args[0] {
        Value::Str(s) => Ok(Value::symbol(s.as_ref())),
        other => Err(EvalError::type_error("symbol", "string", other, 0)),
    }
}
