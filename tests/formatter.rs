//! Token table and source reconstruction tests.

mod common;

use common::{kinds, lex};
use supplyscript::{format_tokens, to_source};

#[test]
fn format_value_and_valueless_rows() {
    let output = format_tokens(&lex("Product ( 3.5 )"));
    assert_eq!(
        output,
        "CLASSTYPE: Product\nLEFTPAREN\nFLOAT:3.5\nRIGHTPAREN\nEOF\n"
    );
}

#[test]
fn format_multiline_comment_rows_are_prefixed() {
    let output = format_tokens(&lex("/* a\nb */"));
    assert_eq!(
        output,
        "STARTCOMMENT\nCOMMENT: a\nCOMMENT:b \nENDCOMMENT\nEOF\n"
    );
}

#[test]
fn format_noise_word_row() {
    let output = format_tokens(&lex("updateInventory"));
    assert_eq!(output, "RESERVEDWORD: update | NOISEWORD: Inventory\nEOF\n");
}

#[test]
fn format_empty_sequence() {
    assert_eq!(format_tokens(&[]), "");
}

#[test]
fn source_separates_tokens_with_spaces() {
    assert_eq!(to_source(&lex("1+2*(3)")), "1 + 2 * ( 3 )");
}

#[test]
fn source_line_comment_ends_line() {
    let rebuilt = to_source(&lex("x // keep\ny"));
    assert_eq!(rebuilt, "x // keep\ny");
    assert_eq!(kinds(&rebuilt), kinds("x // keep\ny"));
}

#[test]
fn source_block_comment_roundtrip() {
    let input = "/* multi\nline */ alert";
    assert_eq!(kinds(&to_source(&lex(input))), kinds(input));
}

#[test]
fn source_keeps_adjacent_operators_apart() {
    let input = "a = = b & & c";
    let rebuilt = to_source(&lex(input));
    assert_eq!(kinds(&rebuilt), kinds(input));
}

#[test]
fn source_restores_keywords_without_padding() {
    assert_eq!(
        to_source(&lex("Order weight execute")),
        "Order weight execute"
    );
}
