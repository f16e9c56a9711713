//! Rox: a small dynamically typed scripting language.
//!
//! The pipeline is scanner → parser → resolver → interpreter.  Static stages
//! report into one [`Diagnostics`] collector and the pipeline stops before the
//! next stage once it holds anything.

pub mod ast;
pub mod ast_printer;
pub mod environment;
pub mod error;
pub mod interpreter;
pub mod parser;
pub mod resolver;
pub mod scanner;
pub mod token;
pub mod value;

use std::io::Write;

use log::info;

use error::{Diagnostics, LoxError};
use interpreter::Interpreter;
use parser::Parser;
use resolver::Resolver;

pub use scanner::scan_tokens;

/// Exit code for a static (lex / parse / resolve) error.
pub const EXIT_STATIC_ERROR: i32 = 65;

/// Exit code for a runtime error.
pub const EXIT_RUNTIME_ERROR: i32 = 70;

/// Result of running one source text.
#[derive(Debug, Default)]
pub struct Outcome {
    /// Static errors, in the order they were found.
    pub diagnostics: Diagnostics,

    /// The runtime error that aborted execution, if any.
    pub runtime_error: Option<LoxError>,
}

impl Outcome {
    pub fn is_ok(&self) -> bool {
        self.diagnostics.is_empty() && self.runtime_error.is_none()
    }

    /// 0 on success, 65 for static errors, 70 for a runtime error.
    pub fn exit_code(&self) -> i32 {
        if self.diagnostics.has_errors() {
            EXIT_STATIC_ERROR
        } else if self.runtime_error.is_some() {
            EXIT_RUNTIME_ERROR
        } else {
            0
        }
    }
}

/// An interpreter that keeps its globals across runs, as a REPL needs.
pub struct Session {
    interpreter: Interpreter,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    /// A session printing to standard output.
    pub fn new() -> Self {
        Self {
            interpreter: Interpreter::new(),
        }
    }

    /// A session printing to `output`.
    pub fn with_output(output: Box<dyn Write>) -> Self {
        Self {
            interpreter: Interpreter::with_output(output),
        }
    }

    pub fn interpreter(&self) -> &Interpreter {
        &self.interpreter
    }

    /// Scan, parse, resolve and execute `source`.
    pub fn run(&mut self, source: &str) -> Outcome {
        let mut outcome = Outcome::default();

        let tokens = scan_tokens(source, &mut outcome.diagnostics);

        let statements = Parser::new(&tokens).parse(&mut outcome.diagnostics);
        if outcome.diagnostics.has_errors() {
            info!("Static errors found, skipping resolution");
            return outcome;
        }

        Resolver::new(&mut self.interpreter).resolve(&statements, &mut outcome.diagnostics);
        if outcome.diagnostics.has_errors() {
            info!("Resolution errors found, skipping execution");
            return outcome;
        }

        if let Err(e) = self.interpreter.interpret(&statements) {
            outcome.runtime_error = Some(e);
        }

        outcome
    }
}

/// Run `source` in a fresh session printing to standard output.
pub fn run(source: &str) -> Outcome {
    Session::new().run(source)
}
