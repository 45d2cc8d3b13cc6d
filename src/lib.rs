//! SupplyScript lexer and arithmetic expression parser.
//!
//! SupplyScript describes supply-chain entities (`Product`, `Supplier`,
//! `Order`) and commands over them (`alert`, `update`, `exec`, ...).
//! This crate turns source text into position-tagged tokens covering the
//! whole language, and parses the arithmetic subset into an expression
//! tree that can be evaluated.
//!
//! # Quick start
//!
//! ```
//! use supplyscript::{tokenize, parse};
//!
//! let tokens = tokenize("1 + 2 * 3").into_result().unwrap();
//! let ast = parse(&tokens).unwrap();
//! assert_eq!(ast.to_string(), "(1, '+', (2, '*', 3))");
//! assert_eq!(ast.evaluate().unwrap(), 7.0);
//! ```
//!
//! ## Partial results on lexical errors
//!
//! ```
//! use supplyscript::{tokenize, LexErrorKind};
//!
//! let scanned = tokenize("quantity = 4 ~");
//! assert_eq!(scanned.tokens.len(), 3);
//! let err = scanned.error.unwrap();
//! assert_eq!(err.kind, LexErrorKind::IllegalCharacter('~'));
//! ```

// Allow noisy pedantic lints that don't add value for
// a library crate.
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions
)]

pub mod ast;
pub mod formatter;
pub mod lexer;
pub mod parser;
pub mod position;
pub mod runner;
pub mod token;

pub use ast::{EvalError, EvalErrorKind, Node};
pub use formatter::{format_ast, format_tokens, to_source};
pub use lexer::{LexError, LexErrorKind, Tokenized, tokenize, tokenize_named};
pub use parser::{MAX_NESTING, ParseError, ParseErrorKind, parse};
pub use position::Position;
pub use runner::{FileError, Mode, RunConfig, RunResult, run, run_file, run_named};
pub use token::{Token, TokenKind};

/// Unified error type covering lexing, parsing, and evaluation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// A lexer error.
    #[error("{0}")]
    Lex(#[from] LexError),
    /// A parser error.
    #[error("{0}")]
    Parse(#[from] ParseError),
    /// An evaluation error.
    #[error("{0}")]
    Eval(#[from] EvalError),
}

impl Error {
    /// Human-readable error name, e.g. `Illegal Character`.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Lex(e) => e.kind.name(),
            Self::Parse(_) => "Invalid Syntax",
            Self::Eval(_) => "Runtime Error",
        }
    }

    /// Where the error starts, when known.
    #[must_use]
    pub const fn pos_start(&self) -> Option<&Position> {
        match self {
            Self::Lex(e) => Some(&e.pos_start),
            Self::Parse(e) => e.pos_start.as_ref(),
            Self::Eval(e) => Some(&e.pos_start),
        }
    }

    /// Offending source line with the error range underlined.
    #[must_use]
    pub fn context(&self) -> Option<String> {
        match self {
            Self::Lex(e) => Some(e.context()),
            Self::Parse(e) => e.context(),
            Self::Eval(e) => Some(e.context()),
        }
    }
}

/// Tokenize and parse an arithmetic expression in one step.
pub fn parse_str(input: &str) -> Result<Node, Error> {
    let tokens = tokenize(input).into_result()?;
    Ok(parse(&tokens)?)
}

/// Tokenize, parse, and evaluate an arithmetic expression.
pub fn eval_str(input: &str) -> Result<f64, Error> {
    Ok(parse_str(input)?.evaluate()?)
}
