// ABOUTME: Trampoline machinery that linearizes tail calls so deep recursion never grows the host stack

use crate::error::LispError;
use crate::value::Value;

/// Either a finished value, or a deferred continuation that produces the
/// next step. `eval_t` returns `More` for every tail position instead of
/// recursing directly, so `run` is the only place tail calls grow a loop
/// rather than the call stack.
pub enum Trampoline<T> {
    Done(T),
    More(Box<dyn FnOnce() -> Result<Trampoline<T>, LispError>>),
}

impl Trampoline<Value> {
    /// Drives the trampoline to completion, looping rather than recursing.
    pub fn run(mut self) -> Result<Value, LispError> {
        loop {
            match self {
                Trampoline::Done(value) => return Ok(value),
                Trampoline::More(thunk) => self = thunk()?,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn done_runs_to_its_value() {
        let t = Trampoline::Done(Value::Integer(42));
        assert!(matches!(t.run().unwrap(), Value::Integer(42)));
    }

    #[test]
    fn chained_more_thunks_do_not_grow_the_stack() {
        fn countdown(n: i64) -> Trampoline<Value> {
            if n == 0 {
                Trampoline::Done(Value::Integer(0))
            } else {
                Trampoline::More(Box::new(move || Ok(countdown(n - 1))))
            }
        }

        let result = countdown(100_000).run().unwrap();
        assert!(matches!(result, Value::Integer(0)));
    }
}
