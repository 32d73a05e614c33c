// ABOUTME: Evaluator module that drives expansion and the tail-call trampoline

use crate::builtins::{arithmetic, comparison, lists, strings, types};
use crate::env::Environment;
use crate::error::{EvalError, LispError, RuntimeError};
use crate::expander::expand;
use crate::reader::read;
use crate::trampoline::Trampoline;
use crate::value::{SpecialForm, Value};
use std::rc::Rc;

/// Public entry point: expands macros to a fixed point, then drives the
/// trampoline for the expanded form to completion.
pub fn eval(form: Value, env: Rc<Environment>) -> Result<Value, LispError> {
    let expanded = expand(&form, &env)?;
    eval_t(expanded, env)?.run()
}

/// Drives a non-tail subexpression (arguments, conditions, all but the last
/// form of a `do`) to a concrete Value on the spot, rather than deferring.
fn eval_non_tail(form: Value, env: Rc<Environment>) -> Result<Value, LispError> {
    eval_t(form, env)?.run()
}

/// The per-form step. Tail positions return `Trampoline::More` so the
/// caller's driver loop resumes instead of this function recursing.
fn eval_t(form: Value, env: Rc<Environment>) -> Result<Trampoline<Value>, LispError> {
    match form {
        Value::Integer(_)
        | Value::Float(_)
        | Value::Str(_)
        | Value::Bool(_)
        | Value::Nil
        | Value::Builtin(_)
        | Value::Lambda { .. }
        | Value::Macro { .. } => Ok(Trampoline::Done(form)),

        Value::Symbol(name) => match env.lookup(&name) {
            Some(value) => Ok(Trampoline::Done(value)),
            None => Err(EvalError::UndefinedSymbol(name.to_string()).into()),
        },

        Value::Cons(..) if form.is_empty_call() => Ok(Trampoline::Done(Value::Nil)),

        Value::Cons(head, tail) => {
            let callee = eval_non_tail((*head).clone(), Rc::clone(&env))?;
            let rest = tail
                .to_vec()
                .ok_or_else(|| EvalError::BadParamList("improper call form".to_string()))?;
            apply(callee, rest, env)
        }
    }
}

fn apply(callee: Value, args: Vec<Value>, env: Rc<Environment>) -> Result<Trampoline<Value>, LispError> {
    match callee {
        Value::Builtin(tag) => eval_special_form(tag, args, env),
        Value::Lambda {
            params,
            variadic,
            body,
            env: captured,
        } => apply_lambda(&params, &variadic, &body, &captured, args, env),
        Value::Macro { params, variadic, body } => {
            // A macro can be def'd and called within the same enclosing form, so the
            // one-shot `expand` pass at the top of `eval` may run before the `def` has
            // executed. Expanding here, lazily, at the point of application, catches
            // that case: by the time we get here the macro's binding is guaranteed live.
            let expanded = crate::expander::substitute_macro("macro", &params, &variadic, &body, &args)?;
            let expanded = expand(&expanded, &env)?;
            eval_t(expanded, env)
        }
        other => Err(EvalError::NotCallable(other.to_printing_string()).into()),
    }
}

fn eval_args(args: &[Value], env: &Rc<Environment>) -> Result<Vec<Value>, LispError> {
    args.iter()
        .map(|a| eval_non_tail(a.clone(), Rc::clone(env)))
        .collect()
}

fn eval_special_form(
    tag: SpecialForm,
    args: Vec<Value>,
    env: Rc<Environment>,
) -> Result<Trampoline<Value>, LispError> {
    use SpecialForm::*;

    match tag {
        Add => Ok(Trampoline::Done(arithmetic::add(&eval_args(&args, &env)?)?)),
        Sub => Ok(Trampoline::Done(arithmetic::sub(&eval_args(&args, &env)?)?)),
        Mul => Ok(Trampoline::Done(arithmetic::mul(&eval_args(&args, &env)?)?)),
        Div => Ok(Trampoline::Done(arithmetic::div(&eval_args(&args, &env)?)?)),
        Mod => Ok(Trampoline::Done(arithmetic::modulo(&eval_args(&args, &env)?)?)),
        Pow => Ok(Trampoline::Done(arithmetic::pow(&eval_args(&args, &env)?)?)),
        Concat => Ok(Trampoline::Done(strings::concat(&eval_args(&args, &env)?)?)),
        Eq => Ok(Trampoline::Done(comparison::eq(&eval_args(&args, &env)?)?)),
        Gt => Ok(Trampoline::Done(comparison::gt(&eval_args(&args, &env)?)?)),
        Lt => Ok(Trampoline::Done(comparison::lt(&eval_args(&args, &env)?)?)),
        Car => Ok(Trampoline::Done(lists::car(&eval_args(&args, &env)?)?)),
        Cdr => Ok(Trampoline::Done(lists::cdr(&eval_args(&args, &env)?)?)),
        Cons => Ok(Trampoline::Done(lists::cons(&eval_args(&args, &env)?)?)),
        TypeOf => Ok(Trampoline::Done(types::type_of(&eval_args(&args, &env)?)?)),
        Symbol => Ok(Trampoline::Done(types::symbol(&eval_args(&args, &env)?)?)),

        Quote => {
            if args.len() != 1 {
                return Err(EvalError::arity_error("quote", crate::error::ARITY_ONE, args.len()).into());
            }
            Ok(Trampoline::Done(args.into_iter().next().unwrap()))
        }

        If => eval_if(args, env),
        Do => eval_do(args, env),
        Def => eval_def(args, env),
        SetBang => eval_set(args, env),
        Lambda => eval_lambda_form(args, env),
        Macro => eval_macro_form(args),
        ExpandMacro => eval_expand_macro(args, env),
        Eval => eval_eval(args, env),
        Raise => eval_raise(args, env),
        Print => eval_print(args, env),
        Read => eval_read(args, env),
        Load => eval_load(args, env),

        Dot => Err(RuntimeError::new(".", "host-object dispatch is not implemented by this interpreter").into()),
        DotField => Err(RuntimeError::new(
            ".-",
            "host-object field access is not implemented by this interpreter",
        )
        .into()),
    }
}

fn eval_if(args: Vec<Value>, env: Rc<Environment>) -> Result<Trampoline<Value>, LispError> {
    if args.len() < 2 || args.len() > 3 {
        return Err(EvalError::arity_error("if", "2-3", args.len()).into());
    }
    let mut iter = args.into_iter();
    let condition = iter.next().unwrap();
    let then_branch = iter.next().unwrap();
    let else_branch = iter.next();

    let test = eval_non_tail(condition, Rc::clone(&env))?;
    if test.is_truthy() {
        Ok(Trampoline::More(Box::new(move || eval_t(then_branch, env))))
    } else if let Some(else_branch) = else_branch {
        Ok(Trampoline::More(Box::new(move || eval_t(else_branch, env))))
    } else {
        Ok(Trampoline::Done(Value::Nil))
    }
}

fn eval_do(args: Vec<Value>, env: Rc<Environment>) -> Result<Trampoline<Value>, LispError> {
    if args.is_empty() {
        return Err(EvalError::arity_error("do", crate::error::ARITY_AT_LEAST_ONE, 0).into());
    }
    let last_index = args.len() - 1;
    let mut forms = args.into_iter();
    for _ in 0..last_index {
        eval_non_tail(forms.next().unwrap(), Rc::clone(&env))?;
    }
    let last = forms.next().unwrap();
    Ok(Trampoline::More(Box::new(move || eval_t(last, env))))
}

fn require_symbol(function: &str, v: &Value) -> Result<Rc<str>, EvalError> {
    match v {
        Value::Symbol(name) => Ok(Rc::clone(name)),
        other => Err(EvalError::type_error(function, "symbol", other, 0)),
    }
}

fn eval_def(args: Vec<Value>, env: Rc<Environment>) -> Result<Trampoline<Value>, LispError> {
    if args.len() != 2 {
        return Err(EvalError::arity_error("def", crate::error::ARITY_TWO, args.len()).into());
    }
    let mut iter = args.into_iter();
    let name = require_symbol("def", &iter.next().unwrap())?;
    let value = eval_non_tail(iter.next().unwrap(), Rc::clone(&env))?;
    env.define(name, value.clone());
    Ok(Trampoline::Done(value))
}

fn eval_set(args: Vec<Value>, env: Rc<Environment>) -> Result<Trampoline<Value>, LispError> {
    if args.len() != 2 {
        return Err(EvalError::arity_error("set!", crate::error::ARITY_TWO, args.len()).into());
    }
    let mut iter = args.into_iter();
    let name = require_symbol("set!", &iter.next().unwrap())?;
    let value = eval_non_tail(iter.next().unwrap(), Rc::clone(&env))?;
    env.assign(&name, value.clone())?;
    Ok(Trampoline::Done(value))
}

/// Parses a lambda/macro parameter list: Nil, or a proper list of Symbols
/// optionally terminated by a trailing `. rest` Symbol pair.
fn parse_param_list(function: &str, params: &Value) -> Result<(Vec<Rc<str>>, Option<Rc<str>>), EvalError> {
    let items = params
        .to_vec()
        .ok_or_else(|| EvalError::BadParamList(format!("{}: parameter list must be a proper list", function)))?;

    let mut fixed = Vec::new();
    let mut variadic = None;
    let mut i = 0;
    while i < items.len() {
        match &items[i] {
            Value::Symbol(s) if s.as_ref() == "." => {
                if i + 2 != items.len() {
                    return Err(EvalError::BadParamList(format!(
                        "{}: expected exactly one parameter after '.'",
                        function
                    )));
                }
                variadic = Some(require_symbol(function, &items[i + 1])?);
                i = items.len();
            }
            Value::Symbol(s) => {
                fixed.push(Rc::clone(s));
                i += 1;
            }
            other => return Err(EvalError::type_error(function, "symbol", other, i)),
        }
    }
    Ok((fixed, variadic))
}

fn eval_lambda_form(args: Vec<Value>, env: Rc<Environment>) -> Result<Trampoline<Value>, LispError> {
    if args.len() != 2 {
        return Err(EvalError::arity_error("lambda", crate::error::ARITY_TWO, args.len()).into());
    }
    let mut iter = args.into_iter();
    let params = iter.next().unwrap();
    let body = iter.next().unwrap();
    let (fixed, variadic) = parse_param_list("lambda", &params)?;
    Ok(Trampoline::Done(Value::Lambda {
        params: Rc::new(fixed),
        variadic,
        body: Rc::new(body),
        env,
    }))
}

fn eval_macro_form(args: Vec<Value>) -> Result<Trampoline<Value>, LispError> {
    if args.len() != 2 {
        return Err(EvalError::arity_error("macro", crate::error::ARITY_TWO, args.len()).into());
    }
    let mut iter = args.into_iter();
    let params = iter.next().unwrap();
    let body = iter.next().unwrap();
    let (fixed, variadic) = parse_param_list("macro", &params)?;
    Ok(Trampoline::Done(Value::Macro {
        params: Rc::new(fixed),
        variadic,
        body: Rc::new(body),
    }))
}

fn eval_expand_macro(args: Vec<Value>, env: Rc<Environment>) -> Result<Trampoline<Value>, LispError> {
    if args.len() != 1 {
        return Err(EvalError::arity_error("expand-macro", crate::error::ARITY_ONE, args.len()).into());
    }
    let form = args.into_iter().next().unwrap();
    Ok(Trampoline::Done(expand(&form, &env)?))
}

fn eval_eval(args: Vec<Value>, env: Rc<Environment>) -> Result<Trampoline<Value>, LispError> {
    if args.len() != 1 {
        return Err(EvalError::arity_error("eval", crate::error::ARITY_ONE, args.len()).into());
    }
    let form = args.into_iter().next().unwrap();
    let value = eval_non_tail(form, Rc::clone(&env))?;
    Ok(Trampoline::Done(eval(value, env)?))
}

fn eval_raise(args: Vec<Value>, env: Rc<Environment>) -> Result<Trampoline<Value>, LispError> {
    if args.len() != 1 {
        return Err(EvalError::arity_error("raise", crate::error::ARITY_ONE, args.len()).into());
    }
    let form = args.into_iter().next().unwrap();
    let value = eval_non_tail(form, env)?;
    Err(RuntimeError::new("raise", value.to_printing_string()).into())
}

fn eval_print(args: Vec<Value>, env: Rc<Environment>) -> Result<Trampoline<Value>, LispError> {
    if args.len() != 1 {
        return Err(EvalError::arity_error("print", crate::error::ARITY_ONE, args.len()).into());
    }
    let value = eval_non_tail(args.into_iter().next().unwrap(), Rc::clone(&env))?;
    env.lookup_io().println(&value.to_printing_string())?;
    Ok(Trampoline::Done(value))
}

fn eval_read(args: Vec<Value>, env: Rc<Environment>) -> Result<Trampoline<Value>, LispError> {
    if !args.is_empty() {
        return Err(EvalError::arity_error("read", "0", args.len()).into());
    }
    let line = env.lookup_io().read_line()?;
    let (value, _) = read(&line)?;
    Ok(Trampoline::Done(value))
}

fn eval_load(args: Vec<Value>, env: Rc<Environment>) -> Result<Trampoline<Value>, LispError> {
    if args.len() != 1 {
        return Err(EvalError::arity_error("load", crate::error::ARITY_ONE, args.len()).into());
    }
    let path_value = eval_non_tail(args.into_iter().next().unwrap(), Rc::clone(&env))?;
    let path = match &path_value {
        Value::Str(s) => s.to_string(),
        other => return Err(EvalError::type_error("load", "string", other, 0).into()),
    };
    let source = env.lookup_io().read_file(&path)?;

    let mut remaining: &str = &source;
    let mut result = Value::Nil;
    loop {
        if crate::reader::is_exhausted(remaining) {
            break;
        }
        let (form, rest) = read(remaining)?;
        result = eval(form, Rc::clone(&env))?;
        remaining = rest;
    }
    Ok(Trampoline::Done(result))
}

fn apply_lambda(
    params: &[Rc<str>],
    variadic: &Option<Rc<str>>,
    body: &Value,
    captured: &Rc<Environment>,
    args: Vec<Value>,
    caller_env: Rc<Environment>,
) -> Result<Trampoline<Value>, LispError> {
    let fixed = params.len();
    match variadic {
        None if args.len() != fixed => {
            return Err(EvalError::arity_error("lambda", fixed.to_string(), args.len()).into())
        }
        Some(_) if args.len() < fixed => {
            return Err(EvalError::arity_error("lambda", format!("at least {}", fixed), args.len()).into())
        }
        _ => {}
    }

    let evaluated: Vec<Value> = args
        .into_iter()
        .map(|a| eval_non_tail(a, Rc::clone(&caller_env)))
        .collect::<Result<_, _>>()?;

    let child = Environment::child(captured);
    for (param, value) in params.iter().zip(evaluated.iter()) {
        child.define(Rc::clone(param), value.clone());
    }
    if let Some(rest) = variadic {
        child.define(Rc::clone(rest), Value::list(evaluated[fixed..].iter().cloned()));
    }

    let body = body.clone();
    Ok(Trampoline::More(Box::new(move || eval_t(body, child))))
}
