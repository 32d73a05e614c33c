// ABOUTME: Interactive read-eval-print loop built on rustyline

use crate::config::{WELCOME_MESSAGE, WELCOME_SUBTITLE};
use crate::env::Environment;
use crate::error::LispError;
use crate::eval::eval;
use crate::io::StdIoAdapter;
use crate::reader::{is_exhausted, read};
use rustyline::error::ReadlineError;
use rustyline::{Config, Editor};
use std::rc::Rc;

const HISTORY_FILE: &str = ".klisp_history";

/// Runs the interactive loop until Ctrl-D or `(quit)`/`(exit)`. Returns the
/// process exit code: 0 on a clean exit.
pub fn run() -> i32 {
    let config = Config::builder().auto_add_history(true).build();
    let mut rl: Editor<(), _> = match Editor::with_config(config) {
        Ok(rl) => rl,
        Err(e) => {
            eprintln!("Failed to initialize REPL: {}", e);
            return 1;
        }
    };
    let _ = rl.load_history(HISTORY_FILE);

    println!("{}", WELCOME_MESSAGE);
    println!("{}", WELCOME_SUBTITLE);

    let env = Environment::new(Rc::new(StdIoAdapter::new()));

    loop {
        let readline = rl.readline("klisp> ");
        match readline {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                if trimmed == "(quit)" || trimmed == "(exit)" {
                    println!("Goodbye!");
                    break;
                }
                evaluate_line(trimmed, &env);
            }
            Err(ReadlineError::Interrupted) => {
                println!("^C");
                continue;
            }
            Err(ReadlineError::Eof) => {
                println!("Goodbye!");
                break;
            }
            Err(err) => {
                eprintln!("Error: {}", err);
                break;
            }
        }
    }

    let _ = rl.save_history(HISTORY_FILE);
    0
}

fn evaluate_line(line: &str, env: &Rc<Environment>) {
    let mut remaining = line;
    while !is_exhausted(remaining) {
        let (form, rest) = match read(remaining) {
            Ok(parsed) => parsed,
            Err(e) => {
                eprintln!("{}", LispError::from(e));
                return;
            }
        };
        match eval(form, Rc::clone(env)) {
            Ok(value) => println!("=> {}", value.show()),
            Err(e) => {
                eprintln!("{}", e);
                return;
            }
        }
        remaining = rest;
    }
}
