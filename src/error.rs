//! Centralised error hierarchy for the interpreter.
//!
//! Three independent classes of failure exist:
//!
//! * [`LoxError`]: static diagnostics from the scanner, parser and resolver.
//!   They are collected rather than thrown, and any one of them prevents
//!   interpretation of the program.
//! * [`RuntimeError`]: raised by the evaluator; aborts the current run.
//! * [`RunError`]: what a whole scan → parse → resolve → interpret pipeline
//!   reports back to the driver, including the process exit code.
//!
//! `return` is *not* modelled here; it travels as
//! [`Completion::Return`](crate::interpreter::Completion).
//!
//! The module **does not** print diagnostics itself.

use std::io;
use thiserror::Error;

use log::info;

use crate::token::Token;

/// Canonical static diagnostic.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum LoxError {
    /// Lexical (scanner) error with source line information.
    #[error("[Zeile {line}] Fehler: {message}")]
    Lex {
        /// Human‑readable description.
        message: String,

        /// 1‑based line where the error occurred.
        line: usize,
    },

    /// Syntactic (parser) error.
    #[error("[Zeile {line}] Fehler: {message}")]
    Parse { message: String, line: usize },

    /// Static‑analysis failure detected by the resolver.
    #[error("[Zeile {line}] Fehler bei '{lexeme}': {message}")]
    Resolve {
        message: String,
        lexeme: String,
        line: usize,
    },

    /// Wrapper around `std::io::Error` (transparent).  Enables `?` on I/O ops.
    #[error(transparent)]
    Io(#[from] io::Error),

    /// UTF‑8 decoding failure when ingesting external text.
    #[error(transparent)]
    Utf8(#[from] std::string::FromUtf8Error),
}

impl LoxError {
    /// Helper constructor for the **scanner**.
    pub fn lex<S: Into<String>>(line: usize, msg: S) -> Self {
        let message: String = msg.into();

        info!("Creating Lex error: line={}, msg={}", line, message);

        LoxError::Lex { message, line }
    }

    /// Helper constructor for the **parser**.
    pub fn parse<S: Into<String>>(line: usize, msg: S) -> Self {
        let message: String = msg.into();

        info!("Creating Parse error: line={}, msg={}", line, message);

        LoxError::Parse { message, line }
    }

    /// Helper constructor for the **resolver**.
    pub fn resolve<S: Into<String>>(token: &Token, msg: S) -> Self {
        let message: String = msg.into();

        info!(
            "Creating Resolve error: line={}, lexeme={}, msg={}",
            token.line, token.lexeme, message
        );

        LoxError::Resolve {
            message,
            lexeme: token.lexeme.clone(),
            line: token.line,
        }
    }

    /// Source line of the diagnostic, if it has one.
    pub fn line(&self) -> Option<usize> {
        match self {
            LoxError::Lex { line, .. }
            | LoxError::Parse { line, .. }
            | LoxError::Resolve { line, .. } => Some(*line),
            LoxError::Io(_) | LoxError::Utf8(_) => None,
        }
    }
}

/// Crate‑wide `Result` alias for static passes.
pub type Result<T> = std::result::Result<T, LoxError>;

/// Error raised while evaluating a program.  Every variant carries the token
/// that caused it so the driver can report the line.
#[derive(Debug, Clone, Error)]
pub enum RuntimeError {
    #[error("Undefinierte Variable '{}'.", .token.lexeme)]
    UndefinedVariable { token: Token },

    #[error("Undefinierte Eigenschaft '{}'.", .token.lexeme)]
    UndefinedProperty { token: Token },

    /// Operand types do not fit the operator named by `token`.
    #[error("{message}")]
    TypeMismatch { token: Token, message: String },

    #[error("Nur Funktionen und Klassen können aufgerufen werden.")]
    NotCallable { token: Token },

    #[error("Nur Instanzen haben Eigenschaften.")]
    NotAnInstance { token: Token },

    #[error("Nur Instanzen haben Felder.")]
    OnlyInstancesHaveFields { token: Token },

    #[error("{expected} Argumente erwartet, aber {actual} erhalten.")]
    ArityMismatch {
        token: Token,
        expected: usize,
        actual: usize,
    },

    #[error("Oberklasse muss eine Klasse sein.")]
    SuperclassMustBeAClass { token: Token },
}

impl RuntimeError {
    /// Operand type error for `operator`.
    pub fn type_mismatch<S: Into<String>>(operator: &Token, msg: S) -> Self {
        RuntimeError::TypeMismatch {
            token: operator.clone(),
            message: msg.into(),
        }
    }

    /// The token the error points at.
    pub fn token(&self) -> &Token {
        match self {
            RuntimeError::UndefinedVariable { token }
            | RuntimeError::UndefinedProperty { token }
            | RuntimeError::TypeMismatch { token, .. }
            | RuntimeError::NotCallable { token }
            | RuntimeError::NotAnInstance { token }
            | RuntimeError::OnlyInstancesHaveFields { token }
            | RuntimeError::ArityMismatch { token, .. }
            | RuntimeError::SuperclassMustBeAClass { token } => token,
        }
    }

    /// 1‑based source line of the offending token.
    pub fn line(&self) -> usize {
        self.token().line
    }
}

/// Outcome of running one piece of source text through the whole pipeline.
#[derive(Debug, Error)]
pub enum RunError {
    /// Scanner, parser or resolver diagnostics; nothing was executed.
    #[error("{} statische(r) Fehler", .0.len())]
    Static(Vec<LoxError>),

    /// Execution started and was aborted.
    #[error("{}\n[Zeile {}]", .0, .0.line())]
    Runtime(#[from] RuntimeError),
}

impl RunError {
    /// Process exit code the command‑line driver uses for this failure.
    pub fn exit_code(&self) -> i32 {
        match self {
            RunError::Static(_) => 65,
            RunError::Runtime(_) => 70,
        }
    }
}
