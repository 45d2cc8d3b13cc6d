use std::fmt;

use crate::position::{DEFAULT_SOURCE_NAME, Position, render_context};
use crate::token::{
    ATTRIBUTES, CLASS_TYPES, NOISE_MARKER, NOISE_WORDS, RESERVED_WORDS, Token, TokenKind,
};

/// Punctuation collected into SPECIALCHAR runs.
pub const SPECIAL_CHARS: &[char] = &['.', ';', '@', '#', '$', '₱', '&', '`', '_', '|'];

/// Classifies a lexer error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LexErrorKind {
    /// Character that cannot start any token.
    IllegalCharacter(char),
    /// `/*` without a closing `*/`. `start` is the body's start index.
    UnterminatedComment { start: usize },
    /// Quote without a matching closing quote. `start` is the body's start index.
    UnterminatedStringLiteral { start: usize },
}

impl LexErrorKind {
    /// Human-readable error name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::IllegalCharacter(_) => "Illegal Character",
            Self::UnterminatedComment { .. } => "Unterminated Comment",
            Self::UnterminatedStringLiteral { .. } => "Unterminated String Literal",
        }
    }
}

impl fmt::Display for LexErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IllegalCharacter(ch) => write!(f, "'{ch}'"),
            Self::UnterminatedComment { start } => {
                write!(
                    f,
                    "Unterminated multi-line comment starting at position {start}"
                )
            }
            Self::UnterminatedStringLiteral { start } => {
                write!(f, "Unterminated string literal starting at position {start}")
            }
        }
    }
}

/// Error produced during lexing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{}: {kind}", kind.name())]
pub struct LexError {
    pub kind: LexErrorKind,
    pub pos_start: Position,
    pub pos_end: Position,
}

impl LexError {
    /// Offending source line with the error range underlined.
    #[must_use]
    pub fn context(&self) -> String {
        render_context(&self.pos_start, &self.pos_end)
    }
}

/// Outcome of a scan: every token produced before the first error, and
/// that error if there was one.
///
/// A successful scan always ends with exactly one EOF token. A failed
/// scan carries the token prefix without EOF.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tokenized {
    pub tokens: Vec<Token>,
    pub error: Option<LexError>,
}

impl Tokenized {
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        self.error.is_none()
    }

    /// Drop the partial tokens on failure.
    ///
    /// # Errors
    ///
    /// Returns the scan's `LexError`, if any.
    pub fn into_result(self) -> Result<Vec<Token>, LexError> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(self.tokens),
        }
    }
}

/// Tokenize SupplyScript source text.
#[must_use]
pub fn tokenize(input: &str) -> Tokenized {
    tokenize_named(DEFAULT_SOURCE_NAME, input)
}

/// Tokenize with `source_name` recorded in every position.
#[must_use]
pub fn tokenize_named(source_name: &str, input: &str) -> Tokenized {
    Lexer::new(source_name, input).tokenize()
}

struct Lexer {
    chars: Vec<char>,
    pos: Position,
}

impl Lexer {
    fn new(source_name: &str, input: &str) -> Self {
        Self {
            chars: input.chars().collect(),
            pos: Position::start(source_name, input),
        }
    }

    fn tokenize(mut self) -> Tokenized {
        let mut tokens = Vec::new();

        while let Some(ch) = self.current() {
            let step = match ch {
                ' ' | '\t' | '\n' => {
                    self.advance();
                    Ok(())
                }
                '/' if self.peek() == Some('/') => {
                    self.read_single_line_comment(&mut tokens);
                    Ok(())
                }
                '/' if self.peek() == Some('*') => self.read_block_comment(&mut tokens),
                '0'..='9' => {
                    tokens.push(self.read_number());
                    Ok(())
                }
                c if c.is_ascii_alphabetic() => {
                    tokens.push(self.read_identifier());
                    Ok(())
                }
                '\'' | '"' => self.read_string_literal().map(|tok| tokens.push(tok)),
                '(' => {
                    tokens.push(self.single(TokenKind::LParen));
                    Ok(())
                }
                ')' => {
                    tokens.push(self.single(TokenKind::RParen));
                    Ok(())
                }
                '{' => {
                    tokens.push(self.single(TokenKind::OpenCurly));
                    Ok(())
                }
                '}' => {
                    tokens.push(self.single(TokenKind::CloseCurly));
                    Ok(())
                }
                ';' => {
                    tokens.push(self.single(TokenKind::Semicolon));
                    Ok(())
                }
                '=' => {
                    tokens.push(self.one_or_two('=', TokenKind::Equiv, TokenKind::AssignEqual));
                    Ok(())
                }
                ':' => {
                    tokens.push(self.single(TokenKind::AssignColon));
                    Ok(())
                }
                '&' | '|' => {
                    tokens.push(self.read_doubled(ch));
                    Ok(())
                }
                c if SPECIAL_CHARS.contains(&c) => {
                    tokens.push(self.read_special_chars());
                    Ok(())
                }
                '+' | '-' | '*' | '/' | '%' | '^' => {
                    tokens.push(self.read_arithmetic_operator(ch));
                    Ok(())
                }
                '!' => {
                    tokens.push(self.one_or_two('=', TokenKind::NotEqual, TokenKind::Not));
                    Ok(())
                }
                '<' => {
                    tokens.push(self.one_or_two('=', TokenKind::LessEqual, TokenKind::Less));
                    Ok(())
                }
                '>' => {
                    tokens.push(self.one_or_two(
                        '=',
                        TokenKind::GreaterEqual,
                        TokenKind::Greater,
                    ));
                    Ok(())
                }
                other => {
                    let start = self.pos.clone();
                    self.advance();
                    Err(LexError {
                        kind: LexErrorKind::IllegalCharacter(other),
                        pos_start: start,
                        pos_end: self.pos.clone(),
                    })
                }
            };

            if let Err(error) = step {
                log::debug!("lex error: {error}");
                return Tokenized {
                    tokens,
                    error: Some(error),
                };
            }
        }

        tokens.push(Token::new(TokenKind::Eof, self.pos.clone(), self.pos.clone()));
        log::trace!("scanned {} tokens", tokens.len());

        Tokenized {
            tokens,
            error: None,
        }
    }

    fn current(&self) -> Option<char> {
        self.chars.get(self.pos.index).copied()
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos.index + 1).copied()
    }

    fn advance(&mut self) {
        let consumed = self.current();
        self.pos.advance(consumed);
    }

    fn make_token(kind: TokenKind, value: Option<String>, start: Position, end: Position) -> Token {
        let token = match value {
            Some(text) => Token::with_value(kind, text, start, end),
            None => Token::new(kind, start, end),
        };
        log::trace!("token {token}");
        token
    }

    fn single(&mut self, kind: TokenKind) -> Token {
        let start = self.pos.clone();
        self.advance();
        Self::make_token(kind, None, start, self.pos.clone())
    }

    /// Emit `double` if the next character is `second`, otherwise `single`.
    fn one_or_two(&mut self, second: char, double: TokenKind, single: TokenKind) -> Token {
        let start = self.pos.clone();
        self.advance();
        let kind = if self.current() == Some(second) {
            self.advance();
            double
        } else {
            single
        };
        Self::make_token(kind, None, start, self.pos.clone())
    }

    /// `&&` / `||`, or a lone `&` / `|` as a special character.
    fn read_doubled(&mut self, ch: char) -> Token {
        let start = self.pos.clone();
        self.advance();
        if self.current() == Some(ch) {
            self.advance();
            let kind = if ch == '&' {
                TokenKind::And
            } else {
                TokenKind::Or
            };
            return Self::make_token(kind, None, start, self.pos.clone());
        }
        Self::make_token(
            TokenKind::SpecialChar,
            Some(ch.to_string()),
            start,
            self.pos.clone(),
        )
    }

    fn read_single_line_comment(&mut self, tokens: &mut Vec<Token>) {
        let start = self.pos.clone();
        self.advance();
        self.advance();
        tokens.push(Self::make_token(
            TokenKind::SingleCommentStart,
            None,
            start.clone(),
            self.pos.clone(),
        ));

        let mut body = String::new();
        while let Some(c) = self.current() {
            if c == '\n' {
                break;
            }
            body.push(c);
            self.advance();
        }

        tokens.push(Self::make_token(
            TokenKind::CommentText,
            Some(body),
            start,
            self.pos.clone(),
        ));
    }

    fn read_block_comment(&mut self, tokens: &mut Vec<Token>) -> Result<(), LexError> {
        let start = self.pos.clone();
        self.advance();
        self.advance();
        let opener_end = self.pos.clone();

        let mut body = String::new();
        loop {
            match self.current() {
                None => {
                    return Err(LexError {
                        kind: LexErrorKind::UnterminatedComment {
                            start: self.pos.index - body.chars().count(),
                        },
                        pos_start: start,
                        pos_end: self.pos.clone(),
                    });
                }
                Some('*') if self.peek() == Some('/') => break,
                Some(c) => {
                    body.push(c);
                    self.advance();
                }
            }
        }

        let body_end = self.pos.clone();
        self.advance();
        self.advance();

        tokens.push(Self::make_token(
            TokenKind::BlockCommentStart,
            None,
            start.clone(),
            opener_end,
        ));
        tokens.push(Self::make_token(
            TokenKind::CommentText,
            Some(body),
            start,
            body_end.clone(),
        ));
        tokens.push(Self::make_token(
            TokenKind::BlockCommentEnd,
            None,
            body_end,
            self.pos.clone(),
        ));
        Ok(())
    }

    /// Digits with at most one `.`; a second `.` ends the literal.
    fn read_number(&mut self) -> Token {
        let start = self.pos.clone();
        let mut text = String::new();
        let mut seen_dot = false;

        while let Some(c) = self.current() {
            match c {
                '.' if seen_dot => break,
                '.' => seen_dot = true,
                '0'..='9' => {}
                _ => break,
            }
            text.push(c);
            self.advance();
        }

        let kind = if seen_dot {
            TokenKind::Float
        } else {
            TokenKind::Int
        };
        Self::make_token(kind, Some(text), start, self.pos.clone())
    }

    fn read_identifier(&mut self) -> Token {
        let start = self.pos.clone();
        let mut word = String::new();

        while let Some(c) = self.current() {
            if !(c.is_ascii_alphanumeric() || c == '_' || c == '$') {
                break;
            }
            word.push(c);
            self.advance();
        }

        let (kind, value) = classify_word(&word);
        Self::make_token(kind, Some(value), start, self.pos.clone())
    }

    fn read_string_literal(&mut self) -> Result<Token, LexError> {
        let start = self.pos.clone();
        let quote = self.current();
        self.advance();

        let mut body = String::new();
        loop {
            match self.current() {
                None => {
                    return Err(LexError {
                        kind: LexErrorKind::UnterminatedStringLiteral {
                            start: self.pos.index - body.chars().count(),
                        },
                        pos_start: start,
                        pos_end: self.pos.clone(),
                    });
                }
                c if c == quote => {
                    self.advance();
                    break;
                }
                Some(c) => {
                    body.push(c);
                    self.advance();
                }
            }
        }

        Ok(Self::make_token(
            TokenKind::StringLiteral,
            Some(body),
            start,
            self.pos.clone(),
        ))
    }

    fn read_special_chars(&mut self) -> Token {
        let start = self.pos.clone();
        let mut run = String::new();

        while let Some(c) = self.current() {
            if !SPECIAL_CHARS.contains(&c) {
                break;
            }
            run.push(c);
            self.advance();
        }

        Self::make_token(TokenKind::SpecialChar, Some(run), start, self.pos.clone())
    }

    fn read_arithmetic_operator(&mut self, ch: char) -> Token {
        if ch == '/' && self.peek() == Some('.') {
            let start = self.pos.clone();
            self.advance();
            self.advance();
            return Self::make_token(TokenKind::FloorDiv, None, start, self.pos.clone());
        }

        let kind = match ch {
            '+' => TokenKind::Add,
            '-' => TokenKind::Sub,
            '*' => TokenKind::Mul,
            '/' => TokenKind::Div,
            '%' => TokenKind::Mod,
            _ => TokenKind::Exp,
        };
        self.single(kind)
    }
}

/// Classify a scanned word: class type, attribute, reserved word, a
/// noise-split reserved word, or a plain identifier. Keyword values keep
/// a leading space.
#[must_use]
pub fn classify_word(word: &str) -> (TokenKind, String) {
    if CLASS_TYPES.contains(&word) {
        return (TokenKind::ClassType, format!(" {word}"));
    }
    if ATTRIBUTES.contains(&word) {
        return (TokenKind::Attribute, format!(" {word}"));
    }
    if RESERVED_WORDS.contains(&word) {
        return (TokenKind::ReservedWord, format!(" {word}"));
    }
    if let Some((_, prefix, noise)) = NOISE_WORDS.iter().find(|(full, _, _)| *full == word) {
        return (
            TokenKind::ReservedWord,
            format!(" {prefix}{NOISE_MARKER}{noise}"),
        );
    }
    (TokenKind::Identifier, word.to_string())
}
