//! String operations: `++`

use crate::error::EvalError;
use crate::value::Value;

/// `(++ "answer: " 42)` => `"answer: 42"`. Every argument contributes its
/// printed form; Str contributes its text directly (unquoted).
pub fn concat(args: &[Value]) -> Result<Value, EvalError> {
    let mut result = String::new();
    for arg in args {
        match arg {
            Value::Str(s) => result.push_str(s),
            other => result.push_str(&other.to_printing_string()),
        }
    }
    Ok(Value::string(result))
}
