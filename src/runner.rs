//! Source text in, side effects out: scan, parse, resolve, interpret.
//!
//! A `Runner` keeps its interpreter between calls, so a REPL can feed it
//! one line at a time and earlier definitions stay visible.

use std::fs;
use std::io::Write;
use std::path::Path;

use log::{debug, info};

use crate::ast::ExprId;
use crate::error::{self, LoxError, RunError};
use crate::interpreter::Interpreter;
use crate::parser::Parser;
use crate::resolver::Resolver;
use crate::scanner::Scanner;
use crate::token::Token;

/// Reads a script as UTF-8.  I/O and decoding failures come back as
/// [`LoxError::Io`] and [`LoxError::Utf8`].
pub fn read_source(path: &Path) -> error::Result<String> {
    info!("Reading source file {:?}", path);

    let bytes: Vec<u8> = fs::read(path)?;

    debug!("Read {} bytes from {:?}", bytes.len(), path);

    Ok(String::from_utf8(bytes)?)
}

pub struct Runner {
    interpreter: Interpreter,
    next_expr_id: ExprId,
}

impl Default for Runner {
    fn default() -> Self {
        Self::new()
    }
}

impl Runner {
    pub fn new() -> Self {
        Self::with_interpreter(Interpreter::new())
    }

    /// A runner whose `drucke` output goes to `out`.
    pub fn with_output(out: Box<dyn Write>) -> Self {
        Self::with_interpreter(Interpreter::with_output(out))
    }

    fn with_interpreter(interpreter: Interpreter) -> Self {
        Self {
            interpreter,
            next_expr_id: 0,
        }
    }

    /// Runs one program.  Static diagnostics from every phase before the
    /// interpreter are returned together and nothing is executed.
    pub fn run(&mut self, source: &str) -> Result<(), RunError> {
        info!("Running {} byte(s) of source", source.len());

        let mut tokens: Vec<Token> = Vec::new();
        let mut errors: Vec<LoxError> = Vec::new();

        for result in Scanner::new(source) {
            match result {
                Ok(token) => tokens.push(token),
                Err(e) => {
                    debug!("Scan error: {}", e);
                    errors.push(e);
                }
            }
        }

        let mut parser = Parser::with_first_id(tokens, self.next_expr_id);
        let parsed = parser.parse();
        // Ids stay unique across runs so resolution tables can be merged.
        self.next_expr_id = parser.next_id();

        let statements = match parsed {
            Ok(statements) => statements,
            Err(parse_errors) => {
                errors.extend(parse_errors);
                return Err(RunError::Static(errors));
            }
        };

        if !errors.is_empty() {
            return Err(RunError::Static(errors));
        }

        let table = Resolver::new()
            .resolve(&statements)
            .map_err(RunError::Static)?;

        self.interpreter.interpret(&statements, table)?;

        Ok(())
    }
}
