// ABOUTME: Version info and REPL welcome text

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const WELCOME_MESSAGE: &str = "klisp";
pub const WELCOME_SUBTITLE: &str = "a small homoiconic Lisp with tail-call elimination";
