#![allow(dead_code)]

use supplyscript::{Node, Token, TokenKind, parse, tokenize};

/// Tokenize, failing the test on a lexical error.
pub fn lex(input: &str) -> Vec<Token> {
    tokenize(input)
        .into_result()
        .unwrap_or_else(|e| panic!("tokenize failed for {input:?}: {e}"))
}

/// Kind sequence of a successful scan, EOF included.
pub fn kinds(input: &str) -> Vec<TokenKind> {
    lex(input).iter().map(|t| t.kind).collect()
}

/// Tokenize and parse, failing the test on any error.
pub fn parse_ok(input: &str) -> Node {
    let tokens = lex(input);
    parse(&tokens).unwrap_or_else(|e| panic!("parse failed for {input:?}: {e}"))
}

/// Assert that `input` evaluates to `expected`.
pub fn assert_evaluates(input: &str, expected: f64) {
    let value = parse_ok(input)
        .evaluate()
        .unwrap_or_else(|e| panic!("evaluation failed for {input:?}: {e}"));
    assert!(
        (value - expected).abs() < 1e-9,
        "{input:?} evaluated to {value}, expected {expected}"
    );
}
