// ABOUTME: IO adapter capability used by `print`/`read`/`load` so evaluation stays host-agnostic

use crate::error::RuntimeError;
use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::fmt;
use std::io::{self, BufRead, Write};

/// The capability surface the evaluator reaches for whenever a form needs to
/// talk to the outside world. Bound once per top-level environment and
/// inherited by every child scope via `Environment::lookup_io`.
pub trait IoAdapter: fmt::Debug {
    /// Reads a single line from input, without the trailing newline.
    fn read_line(&self) -> Result<String, RuntimeError>;

    /// Writes text with no trailing newline.
    fn print(&self, text: &str) -> Result<(), RuntimeError>;

    /// Writes text followed by a newline.
    fn println(&self, text: &str) -> Result<(), RuntimeError> {
        self.print(text)?;
        self.print("\n")
    }

    /// Reads an entire file's contents as a string.
    fn read_file(&self, path: &str) -> Result<String, RuntimeError>;
}

/// The adapter used by the CLI and REPL: stdin/stdout and the real filesystem.
#[derive(Debug, Default)]
pub struct StdIoAdapter;

impl StdIoAdapter {
    pub fn new() -> Self {
        StdIoAdapter
    }
}

impl IoAdapter for StdIoAdapter {
    fn read_line(&self) -> Result<String, RuntimeError> {
        let mut line = String::new();
        let read = io::stdin()
            .lock()
            .read_line(&mut line)
            .map_err(|e| RuntimeError::new("read", e.to_string()))?;
        if read == 0 {
            return Err(RuntimeError::new("read", "end of input"));
        }
        if line.ends_with('\n') {
            line.pop();
            if line.ends_with('\r') {
                line.pop();
            }
        }
        Ok(line)
    }

    fn print(&self, text: &str) -> Result<(), RuntimeError> {
        print!("{}", text);
        io::stdout()
            .flush()
            .map_err(|e| RuntimeError::new("print", e.to_string()))
    }

    fn read_file(&self, path: &str) -> Result<String, RuntimeError> {
        std::fs::read_to_string(path).map_err(|e| RuntimeError::new("load", e.to_string()))
    }
}

/// An in-memory adapter for tests: output is captured into a buffer and
/// input lines are served from a queue supplied up front.
#[derive(Debug, Default)]
pub struct StringIoAdapter {
    input: RefCell<VecDeque<String>>,
    output: RefCell<String>,
    files: RefCell<HashMap<String, String>>,
}

impl StringIoAdapter {
    pub fn new() -> Self {
        StringIoAdapter::default()
    }

    pub fn with_input(lines: impl IntoIterator<Item = impl Into<String>>) -> Self {
        let adapter = StringIoAdapter::new();
        adapter
            .input
            .borrow_mut()
            .extend(lines.into_iter().map(Into::into));
        adapter
    }

    pub fn with_file(self, path: impl Into<String>, contents: impl Into<String>) -> Self {
        self.files.borrow_mut().insert(path.into(), contents.into());
        self
    }

    pub fn output(&self) -> String {
        self.output.borrow().clone()
    }
}

impl IoAdapter for StringIoAdapter {
    fn read_line(&self) -> Result<String, RuntimeError> {
        self.input
            .borrow_mut()
            .pop_front()
            .ok_or_else(|| RuntimeError::new("read", "end of input"))
    }

    fn print(&self, text: &str) -> Result<(), RuntimeError> {
        self.output.borrow_mut().push_str(text);
        Ok(())
    }

    fn read_file(&self, path: &str) -> Result<String, RuntimeError> {
        self.files
            .borrow()
            .get(path)
            .cloned()
            .ok_or_else(|| RuntimeError::new("load", format!("no such file: {}", path)))
    }
}
