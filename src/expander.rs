// ABOUTME: Macro expander that rewrites Cons spines until macro applications reach a fixed point

use crate::env::Environment;
use crate::error::EvalError;
use crate::value::Value;
use std::rc::Rc;

/// Expands `value` under `env`, recursively and bottom-up on the spine.
/// A Cons headed by a Symbol that resolves to a Macro is substituted and
/// then re-expanded in place, so nested macro applications fully unfold.
pub fn expand(value: &Value, env: &Rc<Environment>) -> Result<Value, EvalError> {
    let Value::Cons(head, tail) = value else {
        return Ok(value.clone());
    };

    if value.is_empty_call() {
        return Ok(value.clone());
    }

    if let Value::Symbol(name) = head.as_ref() {
        if let Some(Value::Macro {
            params,
            variadic,
            body,
        }) = env.lookup(name)
        {
            let args = tail
                .to_vec()
                .ok_or_else(|| EvalError::BadParamList(format!("{}: improper argument list", name)))?;
            let expanded = substitute_macro(name, &params, &variadic, &body, &args)?;
            return expand(&expanded, env);
        }
    }

    let expanded_head = expand(head, env)?;
    let expanded_tail = expand(tail, env)?;
    Ok(Value::cons(expanded_head, expanded_tail))
}

/// Binds `args` (unevaluated) to `params`/`variadic` and substitutes them
/// into `body`. Used both by `expand`, walking a form ahead of evaluation,
/// and by `eval::apply`, which expands a macro application lazily at the
/// point it's called so macros defined earlier in the same enclosing form
/// are picked up even though the top-level `expand` pass missed them.
pub(crate) fn substitute_macro(
    name: &str,
    params: &[Rc<str>],
    variadic: &Option<Rc<str>>,
    body: &Value,
    args: &[Value],
) -> Result<Value, EvalError> {
    let fixed = params.len();
    match variadic {
        None if args.len() != fixed => {
            return Err(EvalError::arity_error(name, fixed.to_string(), args.len()))
        }
        Some(_) if args.len() < fixed => {
            return Err(EvalError::arity_error(
                name,
                format!("at least {}", fixed),
                args.len(),
            ))
        }
        _ => {}
    }

    let mut bindings: Vec<(&str, Value)> = params
        .iter()
        .map(|p| p.as_ref())
        .zip(args.iter().cloned())
        .collect();

    if let Some(rest) = variadic {
        let rest_args = Value::list(args[fixed..].iter().cloned());
        bindings.push((rest.as_ref(), rest_args));
    }

    Ok(substitute(body, &bindings))
}

fn substitute(body: &Value, bindings: &[(&str, Value)]) -> Value {
    match body {
        Value::Symbol(name) => bindings
            .iter()
            .find(|(param, _)| *param == name.as_ref())
            .map(|(_, value)| value.clone())
            .unwrap_or_else(|| body.clone()),
        Value::Cons(head, tail) => Value::cons(substitute(head, bindings), substitute(tail, bindings)),
        other => other.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::StringIoAdapter;
    use crate::reader::read;

    fn test_env() -> Rc<Environment> {
        Environment::new(Rc::new(StringIoAdapter::new()))
    }

    fn read_form(src: &str) -> Value {
        read(src).unwrap().0
    }

    #[test]
    fn non_cons_values_pass_through_unchanged() {
        let env = test_env();
        assert!(matches!(
            expand(&Value::Integer(1), &env).unwrap(),
            Value::Integer(1)
        ));
    }

    #[test]
    fn empty_list_passes_through() {
        let env = test_env();
        let empty = Value::cons(Value::Nil, Value::Nil);
        assert!(expand(&empty, &env).unwrap().is_empty_call());
    }

    #[test]
    fn non_macro_heads_expand_their_children_only() {
        let env = test_env();
        let form = read_form("(+ 1 2)");
        let expanded = expand(&form, &env).unwrap();
        assert_eq!(expanded.to_printing_string(), "(+ 1 2)");
    }

    #[test]
    fn unless_macro_expands_to_flipped_if() {
        let env = test_env();
        env.define(
            "unless",
            Value::Macro {
                params: Rc::new(vec!["c".into(), "t".into(), "e".into()]),
                variadic: None,
                body: Rc::new(read_form("(if c e t)")),
            },
        );

        let call = read_form("(unless false 1 2)");
        let expanded = expand(&call, &env).unwrap();
        assert_eq!(expanded.to_printing_string(), "(if false 2 1)");
    }

    #[test]
    fn expansion_reaches_a_fixed_point_for_nested_macros() {
        let env = test_env();
        env.define(
            "twice",
            Value::Macro {
                params: Rc::new(vec!["x".into()]),
                variadic: None,
                body: Rc::new(read_form("(+ x x)")),
            },
        );

        let call = read_form("(twice (twice 1))");
        let expanded = expand(&call, &env).unwrap();
        assert_eq!(expanded.to_printing_string(), "(+ (+ 1 1) (+ 1 1))");

        let reexpanded = expand(&expanded, &env).unwrap();
        assert_eq!(reexpanded.to_printing_string(), expanded.to_printing_string());
    }

    #[test]
    fn wrong_arity_macro_call_is_an_error() {
        let env = test_env();
        env.define(
            "one-arg",
            Value::Macro {
                params: Rc::new(vec!["x".into()]),
                variadic: None,
                body: Rc::new(read_form("x")),
            },
        );
        let call = read_form("(one-arg 1 2)");
        assert!(expand(&call, &env).is_err());
    }
}
