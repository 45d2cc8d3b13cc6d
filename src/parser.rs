use std::fmt;

use crate::ast::Node;
use crate::position::{Position, render_context};
use crate::token::{Token, TokenKind};

/// Classifies a parser error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// A factor found neither a unary sign, a number, nor `(`.
    ExpectedNumber { found: TokenKind },
    /// `(` expression not followed by `)`.
    ExpectedCloseParen { found: TokenKind },
    /// Tokens left over after a complete expression.
    ExpectedOperator { found: TokenKind },
    /// The token slice does not end with EOF.
    MissingEof,
    /// An EOF token appears before the end of the slice.
    EofBeforeEnd,
    /// Parentheses nest deeper than `MAX_NESTING`.
    NestingTooDeep,
}

impl fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ExpectedNumber { .. } => write!(f, "expected int or float"),
            Self::ExpectedCloseParen { .. } => write!(f, "expected ')'"),
            Self::ExpectedOperator { .. } => {
                write!(f, "expected '+', '-', '*' or '/'")
            }
            Self::MissingEof => write!(f, "token stream is not terminated by EOF"),
            Self::EofBeforeEnd => write!(f, "EOF before the end of the token stream"),
            Self::NestingTooDeep => {
                write!(f, "parentheses nested deeper than {MAX_NESTING} levels")
            }
        }
    }
}

/// Error produced during parsing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid Syntax: {kind}")]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub pos_start: Option<Position>,
    pub pos_end: Option<Position>,
}

impl ParseError {
    fn at(kind: ParseErrorKind, token: &Token) -> Self {
        Self {
            kind,
            pos_start: Some(token.pos_start.clone()),
            pos_end: Some(token.pos_end.clone()),
        }
    }

    /// Offending source line with the error range underlined, when the
    /// error carries positions.
    #[must_use]
    pub fn context(&self) -> Option<String> {
        match (&self.pos_start, &self.pos_end) {
            (Some(start), Some(end)) => Some(render_context(start, end)),
            _ => None,
        }
    }
}

/// Parse an EOF-terminated token sequence into an arithmetic expression.
///
/// ```text
/// expr   := term (( + | - ) term)*
/// term   := factor (( * | / ) factor)*
/// factor := ( + | - )* atom
/// atom   := INT | FLOAT | '(' expr ')'
/// ```
///
/// # Errors
///
/// Returns `ParseError` at the first unexpected token, an unclosed
/// parenthesis, parentheses nested deeper than [`MAX_NESTING`], or
/// leftover tokens after the expression.
pub fn parse(tokens: &[Token]) -> Result<Node, ParseError> {
    match tokens.iter().position(|t| t.is(TokenKind::Eof)) {
        Some(at) if at + 1 == tokens.len() => Parser::new(tokens).parse(),
        Some(at) => Err(ParseError::at(ParseErrorKind::EofBeforeEnd, &tokens[at])),
        None => Err(ParseError {
            kind: ParseErrorKind::MissingEof,
            pos_start: None,
            pos_end: None,
        }),
    }
}

/// Deepest parenthesis nesting `parse` accepts.
pub const MAX_NESTING: usize = 100;

const ADDITIVE: &[TokenKind] = &[TokenKind::Add, TokenKind::Sub];
const MULTIPLICATIVE: &[TokenKind] = &[TokenKind::Mul, TokenKind::Div];

struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
    depth: usize,
}

impl<'a> Parser<'a> {
    const fn new(tokens: &'a [Token]) -> Self {
        Self {
            tokens,
            pos: 0,
            depth: 0,
        }
    }

    fn parse(mut self) -> Result<Node, ParseError> {
        let node = self.expr()?;

        let current = self.current();
        if !current.is(TokenKind::Eof) {
            log::debug!("trailing token {current} after expression");
            return Err(ParseError::at(
                ParseErrorKind::ExpectedOperator {
                    found: current.kind,
                },
                current,
            ));
        }

        Ok(node)
    }

    fn current(&self) -> &'a Token {
        &self.tokens[self.pos]
    }

    /// Move to the next token, never past EOF.
    fn advance(&mut self) -> &'a Token {
        let token = self.current();
        if !token.is(TokenKind::Eof) {
            self.pos += 1;
        }
        token
    }

    fn expr(&mut self) -> Result<Node, ParseError> {
        log::trace!("expr at {}", self.current());
        self.bin_op(Self::term, ADDITIVE)
    }

    fn term(&mut self) -> Result<Node, ParseError> {
        log::trace!("term at {}", self.current());
        self.bin_op(Self::factor, MULTIPLICATIVE)
    }

    fn factor(&mut self) -> Result<Node, ParseError> {
        let mut signs = Vec::new();
        while matches!(self.current().kind, TokenKind::Add | TokenKind::Sub) {
            signs.push(self.advance().clone());
        }

        let mut node = self.atom()?;
        while let Some(op) = signs.pop() {
            node = Node::unary(op, node);
        }
        Ok(node)
    }

    fn atom(&mut self) -> Result<Node, ParseError> {
        let token = self.current();
        log::trace!("atom at {token}");

        match token.kind {
            TokenKind::Int | TokenKind::Float => {
                self.advance();
                Ok(Node::number(token.clone()))
            }
            TokenKind::LParen => {
                if self.depth == MAX_NESTING {
                    return Err(ParseError::at(ParseErrorKind::NestingTooDeep, token));
                }
                self.advance();
                self.depth += 1;
                let inner = self.expr()?;
                self.depth -= 1;
                let close = self.current();
                if !close.is(TokenKind::RParen) {
                    return Err(ParseError::at(
                        ParseErrorKind::ExpectedCloseParen { found: close.kind },
                        close,
                    ));
                }
                self.advance();
                Ok(inner)
            }
            found => Err(ParseError::at(
                ParseErrorKind::ExpectedNumber { found },
                token,
            )),
        }
    }

    /// Parse `sub (op sub)*` for `op` in `operators`, folding to the left.
    fn bin_op(
        &mut self,
        sub: fn(&mut Self) -> Result<Node, ParseError>,
        operators: &[TokenKind],
    ) -> Result<Node, ParseError> {
        let mut left = sub(self)?;

        while operators.contains(&self.current().kind) {
            let op = self.advance().clone();
            let right = sub(self)?;
            left = Node::binary(left, op, right);
        }

        Ok(left)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize;

    fn parse_input(input: &str) -> Result<Node, ParseError> {
        let tokens = tokenize(input).into_result().expect("tokenize failed");
        parse(&tokens)
    }

    #[test]
    fn multiplication_binds_tighter() {
        let node = parse_input("1 + 2 * 3").expect("parse failed");
        assert_eq!(node.to_string(), "(1, '+', (2, '*', 3))");
    }

    #[test]
    fn parentheses_group() {
        let node = parse_input("(1 + 2) * 3").expect("parse failed");
        assert_eq!(node.to_string(), "((1, '+', 2), '*', 3)");
    }

    #[test]
    fn left_associative() {
        let node = parse_input("8 - 4 - 2").expect("parse failed");
        assert_eq!(node.to_string(), "((8, '-', 4), '-', 2)");
    }

    #[test]
    fn unary_minus() {
        let node = parse_input("-5 + 3").expect("parse failed");
        assert_eq!(node.to_string(), "((-, 5), '+', 3)");
    }

    #[test]
    fn stacked_unary() {
        let node = parse_input("-+5").expect("parse failed");
        assert_eq!(node.to_string(), "(-, (+, 5))");
    }

    #[test]
    fn missing_operand_points_at_eof() {
        let err = parse_input("1 +").unwrap_err();
        assert_eq!(
            err.kind,
            ParseErrorKind::ExpectedNumber {
                found: TokenKind::Eof
            }
        );
        assert_eq!(err.to_string(), "Invalid Syntax: expected int or float");
        assert_eq!(err.pos_start.map(|p| p.index), Some(3));
    }

    #[test]
    fn unclosed_paren() {
        let err = parse_input("(1 + 2").unwrap_err();
        assert_eq!(
            err.kind,
            ParseErrorKind::ExpectedCloseParen {
                found: TokenKind::Eof
            }
        );
    }

    #[test]
    fn trailing_tokens() {
        let err = parse_input("1 2").unwrap_err();
        assert_eq!(
            err.kind,
            ParseErrorKind::ExpectedOperator {
                found: TokenKind::Int
            }
        );
        assert_eq!(err.pos_start.map(|p| p.index), Some(2));
    }

    #[test]
    fn missing_eof() {
        let mut tokens = tokenize("1").into_result().expect("tokenize failed");
        tokens.pop();
        let err = parse(&tokens).unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::MissingEof);
        assert!(err.context().is_none());
    }

    #[test]
    fn eof_before_end_is_rejected() {
        let mut tokens = tokenize("1").into_result().expect("tokenize failed");
        tokens.extend(tokenize("2").into_result().expect("tokenize failed"));
        let err = parse(&tokens).unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::EofBeforeEnd);
        assert_eq!(err.pos_start.map(|p| p.index), Some(1));
    }

    #[test]
    fn long_sign_run_parses_without_recursion() {
        let input = format!("{}7", "-".repeat(100_000));
        let node = parse_input(&input).expect("parse failed");
        assert!((node.evaluate().expect("evaluates") - 7.0).abs() < f64::EPSILON);
    }

    #[test]
    fn nesting_at_limit_parses() {
        let input = format!("{}1{}", "(".repeat(MAX_NESTING), ")".repeat(MAX_NESTING));
        assert_eq!(parse_input(&input).expect("parse failed").to_string(), "1");
    }

    #[test]
    fn nesting_past_limit_is_syntax_error() {
        let depth = MAX_NESTING + 1;
        let input = format!("{}1{}", "(".repeat(depth), ")".repeat(depth));
        let err = parse_input(&input).unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::NestingTooDeep);
        assert_eq!(err.pos_start.map(|p| p.index), Some(MAX_NESTING));
    }
}
