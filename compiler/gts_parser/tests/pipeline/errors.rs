//! Error kinds and positions.

use gts_parser::ErrorKind;
use pretty_assertions::assert_eq;

use gts_parser::{parse_for_lint, ParserOptions};

use crate::common::{nodes_of, parse_err, parse_ok};

/// A document whose template region starts at byte 120.
fn region_at_120(template: &str) -> String {
    let head = "const T = ";
    let comment = "/".repeat(120 - head.len() - 1);
    let src = format!("{comment}\n{head}{template};\n");
    assert_eq!(src.find("<template>"), Some(120));
    src
}

#[test]
fn test_unterminated_string_is_a_syntax_error_on_line_one() {
    let err = parse_err("console.log('test)", "test.js");
    assert_eq!(err.kind, ErrorKind::Syntax);
    assert_eq!(err.line_number, 1);
    assert_eq!(err.column, 13);
    assert_eq!(err.file_name.as_deref(), Some("test.js"));
    assert_eq!(err.to_string(), format!("{} (1:13)", err.message));
}

#[test]
fn test_template_error_is_translated_into_the_document() {
    let src = region_at_120("<template>{{/if}}</template>");
    let err = parse_err(&src, "component.gts");
    assert_eq!(err.kind, ErrorKind::Syntax);
    assert_eq!(err.index, 130);
    assert_eq!((err.line_number, err.column), (2, 21));
}

#[test]
fn test_island_error_is_translated_into_the_document() {
    // island code ` 1 + ` starts at local offset 16
    let src = region_at_120("<template><b x={ 1 + }/></template>");
    let err = parse_err(&src, "component.gts");
    assert_eq!(err.kind, ErrorKind::Syntax);
    assert_eq!(err.line_number, 2);
    assert!(err.index > 136 && err.index <= 141, "{err}");
}

#[test]
fn test_unterminated_region_is_a_syntax_error() {
    let err = parse_err("export const T = <template><div></div>\n", "open.gts");
    assert_eq!(err.kind, ErrorKind::Syntax);
    assert_eq!(err.line_number, 1);
    assert_eq!(err.index, 17);
}

#[test]
fn test_script_error_after_a_region_keeps_its_position() {
    let err = parse_err("const T = <template>hi</template>;\nconst = 2;\n", "after.gts");
    assert_eq!(err.kind, ErrorKind::Syntax);
    assert_eq!(err.line_number, 2);
}

#[test]
fn test_two_hundred_nested_parentheses_parse() {
    let src = format!("const x = {}1{};\n", "(".repeat(200), ")".repeat(200));
    let result = parse_ok(&src, "deep.js");
    assert_eq!(nodes_of(&result, "VariableDeclarator").len(), 1);
}

#[test]
fn test_runaway_script_nesting_is_an_error_not_an_abort() {
    let src = format!("const x = {}1{};\n", "(".repeat(20_000), ")".repeat(20_000));
    let err = parse_err(&src, "deep.js");
    assert_eq!(err.kind, ErrorKind::Syntax);
    assert_eq!(err.line_number, 1);
}

#[test]
fn test_deeply_nested_template_elements_return() {
    let depth = 20_000;
    let src = format!(
        "export const T = <template>{}{}</template>;\n",
        "<div>".repeat(depth),
        "</div>".repeat(depth)
    );
    match parse_for_lint(&src, &ParserOptions::new().with_file_path("deep.gts")) {
        // the `<template>` element wraps the divs
        Ok(result) => assert_eq!(nodes_of(&result, "GlimmerElementNode").len(), depth + 1),
        Err(err) => assert_eq!(err.kind, ErrorKind::Syntax),
    }
}
