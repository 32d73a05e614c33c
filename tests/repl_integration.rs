// ABOUTME: Integration tests for the ambient REPL-facing layer

// The REPL loop itself (rustyline, history file, Ctrl-C/Ctrl-D handling) lives
// in the binary crate and isn't reachable from here. What IS reachable through
// the library, and worth pinning down, is the behavior the REPL is built on:
// reading several forms off one line, and the REPL's quoted-string display.

use klisp::config::{VERSION, WELCOME_MESSAGE, WELCOME_SUBTITLE};
use klisp::env::Environment;
use klisp::eval::eval;
use klisp::io::StringIoAdapter;
use klisp::reader::{is_exhausted, read};
use klisp::value::Value;
use std::rc::Rc;

fn fresh_env() -> Rc<Environment> {
    Environment::new(Rc::new(StringIoAdapter::new()))
}

/// Mirrors `repl::evaluate_line`: read and evaluate forms one at a time
/// until the line is exhausted, returning every intermediate result.
fn evaluate_line(line: &str, env: &Rc<Environment>) -> Vec<Value> {
    let mut remaining = line;
    let mut results = Vec::new();
    while !is_exhausted(remaining) {
        let (form, rest) = read(remaining).expect("parse failed");
        results.push(eval(form, Rc::clone(env)).expect("eval failed"));
        remaining = rest;
    }
    results
}

#[test]
fn a_single_line_can_hold_several_forms() {
    let env = fresh_env();
    let results = evaluate_line("(def x 1) (def y 2) (+ x y)", &env);
    assert_eq!(results.len(), 3);
    assert!(matches!(results[2], Value::Integer(3)));
}

#[test]
fn definitions_from_one_line_are_visible_on_the_next() {
    let env = fresh_env();
    evaluate_line("(def counter 0)", &env);
    evaluate_line("(set! counter (+ counter 1))", &env);
    let results = evaluate_line("counter", &env);
    assert!(matches!(results[0], Value::Integer(1)));
}

#[test]
fn repl_display_quotes_strings_but_show_is_identical_otherwise() {
    let env = fresh_env();
    let results = evaluate_line(r#"(++ "a" "b")"#, &env);
    assert_eq!(results[0].show(), "\"ab\"");
    assert_eq!(results[0].to_printing_string(), "ab");

    let results = evaluate_line("(+ 1 2)", &env);
    assert_eq!(results[0].show(), results[0].to_printing_string());
}

#[test]
fn welcome_text_and_version_are_nonempty() {
    assert!(!WELCOME_MESSAGE.is_empty());
    assert!(!WELCOME_SUBTITLE.is_empty());
    assert!(!VERSION.is_empty());
}

#[test]
fn blank_and_whitespace_only_lines_hold_no_forms() {
    assert!(is_exhausted(""));
    assert!(is_exhausted("   "));
    assert!(is_exhausted("  ; just a comment\n"));
}
