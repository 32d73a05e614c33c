// ABOUTME: Error types for parsing, evaluation, and runtime failures

use crate::value::Value;
use thiserror::Error;

// ===== Arity constant strings (eliminates allocations in error paths) =====
pub const ARITY_ONE: &str = "1";
pub const ARITY_TWO: &str = "2";
pub const ARITY_AT_LEAST_ONE: &str = "at least 1";
pub const ARITY_AT_LEAST_TWO: &str = "at least 2";

/// A reader failure: malformed or incomplete source text.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct ParseError(pub String);

impl ParseError {
    pub fn new(message: impl Into<String>) -> Self {
        ParseError(message.into())
    }
}

/// A static-ish error raised while evaluating a form: arity, type mismatch,
/// unbound name, calling a non-callable value.
#[derive(Error, Debug, Clone)]
pub enum EvalError {
    #[error("{function}: expected {expected}, got {actual} at argument {position}")]
    TypeMismatch {
        function: String,
        expected: String,
        actual: &'static str,
        position: usize,
    },

    #[error("{function}: expected {expected} argument{}, got {actual}", if *.expected == "1" { "" } else { "s" })]
    ArityError {
        function: String,
        expected: String,
        actual: usize,
    },

    #[error("Undefined symbol: {0}")]
    UndefinedSymbol(String),

    #[error("Undefined variable: {0}")]
    UndefinedVariable(String),

    #[error("Value is not callable: {0}")]
    NotCallable(String),

    #[error("{0} is not a valid parameter list")]
    BadParamList(String),
}

impl EvalError {
    pub fn type_error(function: &str, expected: &str, actual: &Value, position: usize) -> Self {
        EvalError::TypeMismatch {
            function: function.to_string(),
            expected: expected.to_string(),
            actual: actual.type_name(),
            position,
        }
    }

    pub fn arity_error(function: &str, expected: impl Into<String>, actual: usize) -> Self {
        EvalError::ArityError {
            function: function.to_string(),
            expected: expected.into(),
            actual,
        }
    }
}

/// A failure surfaced at run time rather than while shaping a form: I/O
/// failure, division by zero, or a user `raise`.
#[derive(Error, Debug, Clone)]
#[error("{function}: {message}")]
pub struct RuntimeError {
    pub function: String,
    pub message: String,
}

impl RuntimeError {
    pub fn new(function: &str, message: impl Into<String>) -> Self {
        RuntimeError {
            function: function.to_string(),
            message: message.into(),
        }
    }
}

/// The unified error type threaded through `eval` and the CLI. `Display`
/// produces exactly one of the three printed prefixes.
#[derive(Error, Debug, Clone)]
pub enum LispError {
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("Eval error: {0}")]
    Eval(#[from] EvalError),

    #[error("Runtime error: {0}")]
    Runtime(#[from] RuntimeError),
}
