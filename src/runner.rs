//! Entry points shared by the command-line tool, the REPL, and any other
//! front end: run source text or a `.supp` file through the pipeline and
//! collect whatever each stage produced.

use std::fs;
use std::io;
use std::path::Path;

use crate::Error;
use crate::ast::Node;
use crate::lexer::tokenize_named;
use crate::parser::parse;
use crate::position::DEFAULT_SOURCE_NAME;
use crate::token::Token;

/// File extension accepted by [`run_file`].
pub const SOURCE_EXTENSION: &str = "supp";

/// How far to take the source through the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Tokenize only.
    #[default]
    Lex,
    /// Tokenize, then parse an arithmetic expression.
    Parse,
    /// Tokenize, parse, and evaluate.
    Eval,
}

/// Options for [`run_file`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunConfig {
    pub mode: Mode,
    /// Reject paths whose extension is not `.supp`.
    pub check_extension: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            mode: Mode::default(),
            check_extension: true,
        }
    }
}

/// Everything a run produced. On a lex error `tokens` holds the prefix
/// scanned before the fault; `ast` and `value` are only set when their
/// stage succeeded.
#[derive(Debug, Clone, PartialEq)]
pub struct RunResult {
    pub tokens: Vec<Token>,
    pub ast: Option<Node>,
    pub value: Option<f64>,
    pub error: Option<Error>,
}

impl RunResult {
    /// `"{error name}: {details}"`, if the run failed.
    #[must_use]
    pub fn error_message(&self) -> Option<String> {
        self.error.as_ref().map(ToString::to_string)
    }

    #[must_use]
    pub const fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// Errors raised before any source text is read.
#[derive(Debug, thiserror::Error)]
pub enum FileError {
    /// Extension other than `.supp`. Holds the extension with its dot.
    #[error("Error: Unsupported file type '{0}'")]
    UnsupportedFileType(String),
    #[error("Error: File '{0}' not found")]
    NotFound(String),
    #[error("Error: could not read '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },
}

/// Run `source` through the pipeline up to `mode`.
#[must_use]
pub fn run(source: &str, mode: Mode) -> RunResult {
    run_named(DEFAULT_SOURCE_NAME, source, mode)
}

/// Like [`run`], recording `source_name` in every position.
#[must_use]
pub fn run_named(source_name: &str, source: &str, mode: Mode) -> RunResult {
    let scanned = tokenize_named(source_name, source);
    let mut result = RunResult {
        tokens: scanned.tokens,
        ast: None,
        value: None,
        error: scanned.error.map(Error::from),
    };

    if result.error.is_some() || mode == Mode::Lex {
        return result;
    }

    let ast = match parse(&result.tokens) {
        Ok(ast) => ast,
        Err(err) => {
            result.error = Some(err.into());
            return result;
        }
    };

    if mode == Mode::Eval {
        match ast.evaluate() {
            Ok(value) => result.value = Some(value),
            Err(err) => result.error = Some(err.into()),
        }
    }
    result.ast = Some(ast);
    result
}

/// Validate and read a `.supp` file, then [`run_named`] its contents.
///
/// # Errors
///
/// Returns `FileError` for a wrong extension, a missing file, or an
/// unreadable one. Lex/parse failures are reported inside `RunResult`.
pub fn run_file(path: impl AsRef<Path>, config: &RunConfig) -> Result<RunResult, FileError> {
    let path = path.as_ref();
    let display = path.display().to_string();

    if config.check_extension {
        let ext = path
            .extension()
            .map(|e| format!(".{}", e.to_string_lossy()))
            .unwrap_or_default();
        if ext != format!(".{SOURCE_EXTENSION}") {
            return Err(FileError::UnsupportedFileType(ext));
        }
    }

    let text = fs::read_to_string(path).map_err(|source| {
        if source.kind() == io::ErrorKind::NotFound {
            FileError::NotFound(display.clone())
        } else {
            FileError::Io {
                path: display.clone(),
                source,
            }
        }
    })?;

    log::debug!("running {display} ({} bytes)", text.len());
    Ok(run_named(&display, &text, config.mode))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lex_mode_stops_after_tokens() {
        let result = run("Product", Mode::Lex);
        assert!(result.is_ok());
        assert_eq!(result.tokens.len(), 2);
        assert!(result.ast.is_none());
    }

    #[test]
    fn parse_mode_builds_ast() {
        let result = run("1 + 2 * 3", Mode::Parse);
        assert!(result.is_ok());
        assert_eq!(
            result.ast.map(|n| n.to_string()).as_deref(),
            Some("(1, '+', (2, '*', 3))")
        );
        assert!(result.value.is_none());
    }

    #[test]
    fn eval_mode_computes_value() {
        let result = run("(1 + 2) * 3", Mode::Eval);
        assert_eq!(result.value, Some(9.0));
    }

    #[test]
    fn lex_error_message_keeps_prefix() {
        let result = run("1 + ~", Mode::Parse);
        assert_eq!(
            result.error_message().as_deref(),
            Some("Illegal Character: '~'")
        );
        assert_eq!(result.tokens.len(), 2);
        assert!(result.ast.is_none());
    }

    #[test]
    fn unsupported_extension() {
        let err = run_file("inventory.txt", &RunConfig::default()).unwrap_err();
        assert_eq!(err.to_string(), "Error: Unsupported file type '.txt'");
    }

    #[test]
    fn missing_extension() {
        let err = run_file("inventory", &RunConfig::default()).unwrap_err();
        assert_eq!(err.to_string(), "Error: Unsupported file type ''");
    }

    #[test]
    fn missing_file() {
        let err = run_file("no/such/dir/inventory.supp", &RunConfig::default()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Error: File 'no/such/dir/inventory.supp' not found"
        );
    }
}
