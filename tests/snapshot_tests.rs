//! Snapshot tests using insta
//!
//! Inline snapshots of representative formatter output.

use insta::assert_snapshot;
use parenpress::{format_with, PrinterConfig};

/// Format with an explicit margin and snapshot the result
fn fmt(input: &str, margin: usize) -> String {
    format_with(input, &PrinterConfig::new().with_margin(margin)).unwrap()
}

#[test]
fn snapshot_flat_call() {
    assert_snapshot!(fmt("(cons 1 2)", 80), @"(cons 1 2)
");
}

#[test]
fn snapshot_wrapped_call() {
    assert_snapshot!(fmt("(combine alpha beta gamma delta)", 20), @"(combine alpha beta
         gamma
         delta)
");
}

#[test]
fn snapshot_nested_definition() {
    assert_snapshot!(fmt("(defun square (x) (* x x))", 80), @"(defun square (x) (* x x))
");
}

#[test]
fn snapshot_quoted_structure() {
    assert_snapshot!(fmt("'(one two (three . four))", 80), @"'(one two (three . four))
");
}
