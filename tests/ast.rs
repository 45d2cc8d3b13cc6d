//! Expression tree evaluation tests.

mod common;

use common::{assert_evaluates, parse_ok};
use supplyscript::{Error, EvalErrorKind, eval_str};

#[test]
fn eval_precedence() {
    assert_evaluates("1 + 2 * 3", 7.0);
}

#[test]
fn eval_grouping() {
    assert_evaluates("(1 + 2) * 3", 9.0);
}

#[test]
fn eval_unary_minus() {
    assert_evaluates("-5 + 3", -2.0);
}

#[test]
fn eval_mixed_signs() {
    assert_evaluates("-+5", -5.0);
    assert_evaluates("--5", 5.0);
    assert_evaluates("+-(2 * 3)", -6.0);
}

#[test]
fn eval_subtraction_is_left_associative() {
    assert_evaluates("10 - 4 - 3", 3.0);
}

#[test]
fn eval_division_is_left_associative() {
    assert_evaluates("64 / 8 / 2", 4.0);
}

#[test]
fn eval_floats() {
    assert_evaluates("2.5 * 4", 10.0);
    assert_evaluates("1. + 0.25", 1.25);
}

#[test]
fn eval_integer_division_is_exact() {
    assert_evaluates("7 / 2", 3.5);
}

#[test]
fn eval_leading_zeros() {
    assert_evaluates("007 + 1", 8.0);
}

#[test]
fn eval_division_by_zero() {
    let err = parse_ok("1 / (2 - 2)").evaluate().unwrap_err();
    assert_eq!(err.kind, EvalErrorKind::DivisionByZero);
    assert_eq!(err.pos_start.index, 5);
    assert_eq!(err.pos_end.index, 10);
}

#[test]
fn eval_str_reports_runtime_error() {
    let err = eval_str("3 / 0").unwrap_err();
    assert!(matches!(err, Error::Eval(_)));
    assert_eq!(err.to_string(), "Runtime Error: division by zero");
    assert_eq!(err.context().as_deref(), Some("3 / 0\n    ^"));
}

#[test]
fn eval_tree_is_reusable() {
    let tree = parse_ok("6 * 7");
    let first = tree.evaluate().unwrap();
    let second = tree.evaluate().unwrap();
    assert!((first - second).abs() < f64::EPSILON);
}

#[test]
fn tree_clone_is_deep() {
    let tree = parse_ok("1 + 2");
    let copy = tree.clone();
    assert_eq!(tree, copy);
    assert_eq!(copy.to_string(), "(1, '+', 2)");
}
