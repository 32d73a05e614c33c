// ABOUTME: Environment module for managing variable bindings, scopes, and the IO adapter

use crate::error::EvalError;
use crate::io::IoAdapter;
use crate::value::Value;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

#[derive(Debug)]
pub struct Environment {
    bindings: RefCell<HashMap<Rc<str>, Value>>,
    parent: Option<Rc<Environment>>,
    io: Option<Rc<dyn IoAdapter>>,
}

impl Environment {
    /// Creates a new global environment with no parent and the given IO adapter.
    pub fn new(io: Rc<dyn IoAdapter>) -> Rc<Self> {
        Rc::new(Environment {
            bindings: RefCell::new(HashMap::new()),
            parent: None,
            io: Some(io),
        })
    }

    /// Creates a child scope. The child has no IO adapter of its own; lookups
    /// walk up to the defining frame via `lookup_io`.
    pub fn child(parent: &Rc<Environment>) -> Rc<Self> {
        Rc::new(Environment {
            bindings: RefCell::new(HashMap::new()),
            parent: Some(Rc::clone(parent)),
            io: None,
        })
    }

    /// Defines a binding in THIS scope (doesn't walk the parent chain).
    pub fn define(&self, name: impl Into<Rc<str>>, value: Value) {
        self.bindings.borrow_mut().insert(name.into(), value);
    }

    /// Looks up a symbol in this scope and parent scopes recursively.
    pub fn lookup(&self, name: &str) -> Option<Value> {
        if let Some(value) = self.bindings.borrow().get(name) {
            return Some(value.clone());
        }

        if let Some(ref parent) = self.parent {
            return parent.lookup(name);
        }

        None
    }

    /// Mutates the nearest existing binding for `name`. Fails if the symbol
    /// is not bound anywhere in the chain.
    pub fn assign(&self, name: &str, value: Value) -> Result<(), EvalError> {
        if self.bindings.borrow().contains_key(name) {
            self.bindings.borrow_mut().insert(name.into(), value);
            return Ok(());
        }

        if let Some(ref parent) = self.parent {
            return parent.assign(name, value);
        }

        Err(EvalError::UndefinedVariable(name.to_string()))
    }

    /// Walks up the chain to find the IO adapter bound at the root frame.
    pub fn lookup_io(&self) -> Rc<dyn IoAdapter> {
        if let Some(ref io) = self.io {
            return Rc::clone(io);
        }
        match &self.parent {
            Some(parent) => parent.lookup_io(),
            None => panic!("environment chain has no IO adapter"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::StringIoAdapter;

    fn test_env() -> Rc<Environment> {
        Environment::new(Rc::new(StringIoAdapter::new()))
    }

    #[test]
    fn define_and_lookup() {
        let env = test_env();
        env.define("x", Value::Integer(42));
        assert!(matches!(env.lookup("x"), Some(Value::Integer(42))));
    }

    #[test]
    fn undefined_symbol_is_none() {
        let env = test_env();
        assert!(env.lookup("undefined").is_none());
    }

    #[test]
    fn child_shadows_parent() {
        let parent = test_env();
        parent.define("x", Value::Integer(42));

        let child = Environment::child(&parent);
        child.define("x", Value::Integer(100));

        assert!(matches!(child.lookup("x"), Some(Value::Integer(100))));
        assert!(matches!(parent.lookup("x"), Some(Value::Integer(42))));
    }

    #[test]
    fn child_sees_parent_bindings() {
        let parent = test_env();
        parent.define("x", Value::Integer(42));

        let child = Environment::child(&parent);
        assert!(matches!(child.lookup("x"), Some(Value::Integer(42))));
    }

    #[test]
    fn multiple_levels_resolve() {
        let grandparent = test_env();
        grandparent.define("a", Value::Integer(1));

        let parent = Environment::child(&grandparent);
        parent.define("b", Value::Integer(2));

        let child = Environment::child(&parent);
        child.define("c", Value::Integer(3));

        assert!(matches!(child.lookup("a"), Some(Value::Integer(1))));
        assert!(matches!(child.lookup("b"), Some(Value::Integer(2))));
        assert!(matches!(child.lookup("c"), Some(Value::Integer(3))));
    }

    #[test]
    fn assign_mutates_defining_frame() {
        let parent = test_env();
        parent.define("x", Value::Integer(1));
        let child = Environment::child(&parent);

        child.assign("x", Value::Integer(2)).unwrap();
        assert!(matches!(parent.lookup("x"), Some(Value::Integer(2))));
    }

    #[test]
    fn assign_undefined_is_an_error() {
        let env = test_env();
        assert!(env.assign("missing", Value::Integer(1)).is_err());
    }

    #[test]
    fn child_inherits_io_adapter() {
        let parent = test_env();
        let child = Environment::child(&parent);
        child.lookup_io().println("via child").unwrap();
    }
}
