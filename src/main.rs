// ABOUTME: CLI entry point for the klisp binary

mod builtins;
mod config;
mod env;
mod error;
mod eval;
mod expander;
mod io;
mod reader;
mod repl;
mod trampoline;
mod value;

use clap::{Parser, Subcommand};
use env::Environment;
use error::LispError;
use eval::eval;
use io::StdIoAdapter;
use reader::{is_exhausted, read};
use std::path::PathBuf;
use std::rc::Rc;

#[derive(Parser, Debug)]
#[command(name = "klisp")]
#[command(version = config::VERSION)]
#[command(about = "A small homoiconic Lisp with tail-call elimination")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the interactive REPL
    Repl,
    /// Evaluate a file or an inline expression
    Run {
        /// Script file to execute
        file: Option<PathBuf>,

        /// Evaluate EXPR instead of reading a file
        #[arg(short = 'e', long = "eval")]
        eval: Option<String>,
    },
}

fn main() {
    let cli = Cli::parse();

    let code = match cli.command {
        None | Some(Command::Repl) => repl::run(),
        Some(Command::Run { file, eval: expr }) => run_command(file, expr),
    };

    std::process::exit(code);
}

fn run_command(file: Option<PathBuf>, expr: Option<String>) -> i32 {
    let source = match (file, expr) {
        (_, Some(expr)) => expr,
        (Some(path), None) => match std::fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(e) => {
                eprintln!("Runtime error: cannot read {}: {}", path.display(), e);
                return 1;
            }
        },
        (None, None) => {
            eprintln!("Runtime error: run requires a FILE or --eval EXPR");
            return 1;
        }
    };

    let env = Environment::new(Rc::new(StdIoAdapter::new()));
    let mut remaining: &str = &source;

    while !is_exhausted(remaining) {
        let (form, rest) = match read(remaining) {
            Ok(parsed) => parsed,
            Err(e) => {
                eprintln!("{}", LispError::from(e));
                return 1;
            }
        };
        if let Err(e) = eval(form, Rc::clone(&env)) {
            eprintln!("{}", e);
            return 1;
        }
        remaining = rest;
    }

    0
}
