use std::fmt;

use crate::position::{Position, render_context};
use crate::token::{Token, TokenKind};

/// Arithmetic expression tree. Every node owns its children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// INT or FLOAT literal.
    Number(Token),
    /// Leading `+` or `-` applied to `operand`.
    UnaryOp { op: Token, operand: Box<Self> },
    /// `left op right` with `op` one of `+ - * /`.
    BinaryOp {
        left: Box<Self>,
        op: Token,
        right: Box<Self>,
    },
}

impl Node {
    #[must_use]
    pub const fn number(token: Token) -> Self {
        Self::Number(token)
    }

    #[must_use]
    pub fn unary(op: Token, operand: Self) -> Self {
        Self::UnaryOp {
            op,
            operand: Box::new(operand),
        }
    }

    #[must_use]
    pub fn binary(left: Self, op: Token, right: Self) -> Self {
        Self::BinaryOp {
            left: Box::new(left),
            op,
            right: Box::new(right),
        }
    }

    /// Start of the leftmost token in this subtree.
    #[must_use]
    pub fn pos_start(&self) -> &Position {
        let mut node = self;
        loop {
            match node {
                Self::Number(tok) => return &tok.pos_start,
                Self::UnaryOp { op, .. } => return &op.pos_start,
                Self::BinaryOp { left, .. } => node = left,
            }
        }
    }

    /// End of the rightmost token in this subtree.
    #[must_use]
    pub fn pos_end(&self) -> &Position {
        let mut node = self;
        loop {
            match node {
                Self::Number(tok) => return &tok.pos_end,
                Self::UnaryOp { operand, .. } => node = operand,
                Self::BinaryOp { right, .. } => node = right,
            }
        }
    }

    /// Evaluate the tree in order, converting literal text to numbers.
    ///
    /// Walks the tree with an explicit work stack, so depth is bounded by
    /// memory rather than the call stack.
    ///
    /// # Errors
    ///
    /// Returns `EvalError` on division by zero or an unreadable literal.
    pub fn evaluate(&self) -> Result<f64, EvalError> {
        let mut work = vec![Step::Visit(self)];
        let mut values: Vec<f64> = Vec::new();

        while let Some(step) = work.pop() {
            match step {
                Step::Visit(node) => match node {
                    Self::Number(tok) => values.push(literal(tok)?),
                    Self::UnaryOp { operand, .. } => {
                        work.push(Step::Apply(node));
                        work.push(Step::Visit(operand));
                    }
                    Self::BinaryOp { left, right, .. } => {
                        work.push(Step::Apply(node));
                        work.push(Step::Visit(right));
                        work.push(Step::Visit(left));
                    }
                },
                Step::Apply(node) => {
                    let value = apply(node, &mut values)?;
                    values.push(value);
                }
            }
        }

        Ok(values.pop().unwrap_or_default())
    }

    /// Detach both children, leaving cheap leaves in their place.
    fn take_children(&mut self, out: &mut Vec<Self>) {
        match self {
            Self::Number(_) => {}
            Self::UnaryOp { op, operand } => detach(operand, op, out),
            Self::BinaryOp { left, op, right } => {
                detach(left, op, out);
                detach(right, op, out);
            }
        }
    }
}

fn detach(child: &mut Node, op: &Token, out: &mut Vec<Node>) {
    if !matches!(child, Node::Number(_)) {
        out.push(std::mem::replace(child, Node::Number(op.clone())));
    }
}

/// Dropping a deep tree must not recurse once per level.
impl Drop for Node {
    fn drop(&mut self) {
        let mut pending = Vec::new();
        self.take_children(&mut pending);
        while let Some(mut node) = pending.pop() {
            node.take_children(&mut pending);
        }
    }
}

enum Step<'a> {
    Visit(&'a Node),
    Apply(&'a Node),
}

fn literal(tok: &Token) -> Result<f64, EvalError> {
    tok.text().parse::<f64>().map_err(|_| EvalError {
        kind: EvalErrorKind::InvalidNumber(tok.text().to_string()),
        pos_start: tok.pos_start.clone(),
        pos_end: tok.pos_end.clone(),
    })
}

/// Combine the operand values on top of `values` for `node`'s operator.
fn apply(node: &Node, values: &mut Vec<f64>) -> Result<f64, EvalError> {
    match node {
        Node::Number(tok) => literal(tok),
        Node::UnaryOp { op, .. } => {
            let value = values.pop().unwrap_or_default();
            Ok(if op.is(TokenKind::Sub) { -value } else { value })
        }
        Node::BinaryOp { op, right, .. } => {
            let rhs = values.pop().unwrap_or_default();
            let lhs = values.pop().unwrap_or_default();
            match op.kind {
                TokenKind::Add => Ok(lhs + rhs),
                TokenKind::Sub => Ok(lhs - rhs),
                TokenKind::Mul => Ok(lhs * rhs),
                TokenKind::Div if rhs == 0.0 => Err(EvalError {
                    kind: EvalErrorKind::DivisionByZero,
                    pos_start: right.pos_start().clone(),
                    pos_end: right.pos_end().clone(),
                }),
                TokenKind::Div => Ok(lhs / rhs),
                other => Err(EvalError {
                    kind: EvalErrorKind::UnsupportedOperator(other),
                    pos_start: op.pos_start.clone(),
                    pos_end: op.pos_end.clone(),
                }),
            }
        }
    }
}

enum Piece<'a> {
    Node(&'a Node),
    Text(&'a str),
}

/// `1`, `(-, 5)`, `(1, '+', (2, '*', 3))`.
impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut pending = vec![Piece::Node(self)];

        while let Some(piece) = pending.pop() {
            match piece {
                Piece::Text(text) => f.write_str(text)?,
                Piece::Node(Self::Number(tok)) => f.write_str(tok.text())?,
                Piece::Node(Self::UnaryOp { op, operand }) => {
                    write!(f, "({}, ", op.kind.symbol().unwrap_or("?"))?;
                    pending.push(Piece::Text(")"));
                    pending.push(Piece::Node(operand));
                }
                Piece::Node(Self::BinaryOp { left, op, right }) => {
                    f.write_str("(")?;
                    pending.push(Piece::Text(")"));
                    pending.push(Piece::Node(right));
                    pending.push(Piece::Text("', "));
                    pending.push(Piece::Text(op.kind.symbol().unwrap_or("?")));
                    pending.push(Piece::Text(", '"));
                    pending.push(Piece::Node(left));
                }
            }
        }

        Ok(())
    }
}

/// Classifies an evaluation error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EvalErrorKind {
    DivisionByZero,
    /// Literal text that does not read as a number.
    InvalidNumber(String),
    /// Operator outside `+ - * /` in a hand-built tree.
    UnsupportedOperator(TokenKind),
}

impl fmt::Display for EvalErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DivisionByZero => write!(f, "division by zero"),
            Self::InvalidNumber(text) => write!(f, "invalid number '{text}'"),
            Self::UnsupportedOperator(kind) => write!(f, "unsupported operator {kind}"),
        }
    }
}

/// Error produced while evaluating a tree.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Runtime Error: {kind}")]
pub struct EvalError {
    pub kind: EvalErrorKind,
    pub pos_start: Position,
    pub pos_end: Position,
}

impl EvalError {
    /// Offending source line with the error range underlined.
    #[must_use]
    pub fn context(&self) -> String {
        render_context(&self.pos_start, &self.pos_end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tok(kind: TokenKind, value: Option<&str>) -> Token {
        let pos = Position::start("t.supp", "");
        match value {
            Some(text) => Token::with_value(kind, text, pos.clone(), pos),
            None => Token::new(kind, pos.clone(), pos),
        }
    }

    fn num(text: &str) -> Node {
        Node::number(tok(TokenKind::Int, Some(text)))
    }

    #[test]
    fn display_nested() {
        let tree = Node::binary(
            num("1"),
            tok(TokenKind::Add, None),
            Node::binary(num("2"), tok(TokenKind::Mul, None), num("3")),
        );
        assert_eq!(tree.to_string(), "(1, '+', (2, '*', 3))");
    }

    #[test]
    fn display_unary() {
        let tree = Node::unary(tok(TokenKind::Sub, None), num("5"));
        assert_eq!(tree.to_string(), "(-, 5)");
    }

    #[test]
    fn evaluate_precedence_tree() {
        let tree = Node::binary(
            num("1"),
            tok(TokenKind::Add, None),
            Node::binary(num("2"), tok(TokenKind::Mul, None), num("3")),
        );
        assert!((tree.evaluate().expect("evaluates") - 7.0).abs() < f64::EPSILON);
    }

    #[test]
    fn evaluate_double_negation() {
        let tree = Node::unary(
            tok(TokenKind::Sub, None),
            Node::unary(tok(TokenKind::Sub, None), num("4")),
        );
        assert!((tree.evaluate().expect("evaluates") - 4.0).abs() < f64::EPSILON);
    }

    #[test]
    fn evaluate_division_by_zero() {
        let tree = Node::binary(num("1"), tok(TokenKind::Div, None), num("0"));
        let err = tree.evaluate().unwrap_err();
        assert_eq!(err.kind, EvalErrorKind::DivisionByZero);
        assert_eq!(err.to_string(), "Runtime Error: division by zero");
    }

    #[test]
    fn evaluate_rejects_foreign_operator() {
        let tree = Node::binary(num("1"), tok(TokenKind::Mod, None), num("2"));
        let err = tree.evaluate().unwrap_err();
        assert_eq!(err.kind, EvalErrorKind::UnsupportedOperator(TokenKind::Mod));
    }

    #[test]
    fn deep_left_spine_evaluates_displays_and_drops() {
        let mut tree = num("1");
        for _ in 1..100_000 {
            tree = Node::binary(tree, tok(TokenKind::Add, None), num("1"));
        }
        assert!((tree.evaluate().expect("evaluates") - 100_000.0).abs() < f64::EPSILON);
        let rendered = tree.to_string();
        assert!(rendered.starts_with(&format!("{}1, '+', 1)", "(".repeat(99_999))));
        assert!(rendered.ends_with(", '+', 1)"));
        drop(tree);
    }

    #[test]
    fn deep_unary_chain_evaluates() {
        let mut tree = num("3");
        for _ in 0..100_001 {
            tree = Node::unary(tok(TokenKind::Sub, None), tree);
        }
        assert!((tree.evaluate().expect("evaluates") + 3.0).abs() < f64::EPSILON);
        assert!(tree.to_string().starts_with("(-, (-, "));
    }

    #[test]
    fn evaluation_order_reports_leftmost_error() {
        let tree = Node::binary(
            Node::binary(num("1"), tok(TokenKind::Div, None), num("0")),
            tok(TokenKind::Add, None),
            num("x"),
        );
        let err = tree.evaluate().unwrap_err();
        assert_eq!(err.kind, EvalErrorKind::DivisionByZero);
    }
}
