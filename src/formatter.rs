//! Text renderings of token sequences and expression trees.
//!
//! Token tables are one row per token (`KIND:value`), the layout the
//! GUI and REPL front ends print. `to_source` goes the other way and
//! rebuilds SupplyScript text from tokens.

use std::fmt::Write as _;

use crate::ast::Node;
use crate::token::{Token, TokenKind};

/// Render tokens as a table, one `KIND:value` row per line.
#[must_use]
pub fn format_tokens(tokens: &[Token]) -> String {
    let mut out = String::new();
    for token in tokens {
        let _ = writeln!(out, "{token}");
    }
    out
}

/// Render an expression tree in its tuple form, e.g. `(1, '+', 2)`.
#[must_use]
pub fn format_ast(node: &Node) -> String {
    node.to_string()
}

/// Rebuild source text from `tokens`.
///
/// Tokens are separated by a single space, except that comment bodies sit
/// directly against their delimiters. A single-line comment body is
/// followed by a newline so the next token is not swallowed. Re-tokenizing
/// the result yields the same kind sequence.
#[must_use]
pub fn to_source(tokens: &[Token]) -> String {
    let mut out = String::new();
    let mut in_line_comment = false;
    let mut prev: Option<TokenKind> = None;

    for token in tokens {
        if token.kind == TokenKind::Eof {
            break;
        }
        if needs_separator(prev, token.kind) && !out.ends_with('\n') {
            out.push(' ');
        }

        match token.kind {
            TokenKind::SingleCommentStart => in_line_comment = true,
            TokenKind::BlockCommentStart => in_line_comment = false,
            _ => {}
        }

        push_lexeme(&mut out, token);

        if token.kind == TokenKind::CommentText && in_line_comment {
            out.push('\n');
            in_line_comment = false;
        }
        prev = Some(token.kind);
    }

    out
}

/// Comment delimiters hug their body; everything else is space-separated.
fn needs_separator(prev: Option<TokenKind>, next: TokenKind) -> bool {
    match prev {
        None | Some(TokenKind::SingleCommentStart | TokenKind::BlockCommentStart) => false,
        Some(_) => next != TokenKind::BlockCommentEnd,
    }
}

fn push_lexeme(out: &mut String, token: &Token) {
    if let Some(symbol) = token.kind.symbol() {
        out.push_str(symbol);
        return;
    }

    match token.kind {
        TokenKind::StringLiteral => {
            let body = token.text();
            let quote = if body.contains('"') { '\'' } else { '"' };
            out.push(quote);
            out.push_str(body);
            out.push(quote);
        }
        TokenKind::ClassType | TokenKind::Attribute => {
            out.push_str(token.text().trim_start());
        }
        TokenKind::ReservedWord => {
            if let Some((word, noise)) = token.reserved_parts() {
                out.push_str(word);
                out.push_str(noise.unwrap_or(""));
            }
        }
        _ => out.push_str(token.text()),
    }
}
