use pretty_assertions::assert_eq;

use super::support::*;
use crate::expander::EvalError;

#[test]
fn test_unknown_macro_is_echoed() {
    validate("Bla #NOT_A_MACRO(1, 2) bla", "Bla #NOT_A_MACRO(1, 2) bla", &[]);
    validate("#NOPE(abc", "#NOPE(abc", &[]);
}

#[test]
fn test_unknown_macro_inside_known_call_is_argument_text() {
    validate(
        "#REF_DSL(g(#NOPE(y)) #REF_THIS(x))",
        "end",
        &[
            ("REF_THIS", &["x"], "r"),
            ("REF_DSL", &["g(#NOPE(y)) r"], "end"),
        ],
    );
}

#[test]
fn test_child_frame_is_folded_into_parent_arguments() {
    validate(
        "#REF_DSL(f(#REF_THIS(x)))",
        "end",
        &[("REF_THIS", &["x"], "r1"), ("REF_DSL", &["f(r1)"], "end")],
    );
}

#[test]
fn test_sibling_calls_in_one_loose_body() {
    validate(
        "#REF_DSL(a(#REF_THIS(1)) #REF_THIS(2))",
        "done",
        &[
            ("REF_THIS", &["1"], "x"),
            ("REF_THIS", &["2"], "y"),
            ("REF_DSL", &["a(x) y"], "done"),
        ],
    );
}

#[test]
fn test_loose_body_without_children_keeps_raw_pieces() {
    validate(
        "#SUM(f(1), 'a b')",
        "ok",
        &[("SUM", &["f(1), ", "'a b'"], "ok")],
    );
}

#[test]
fn test_unclosed_known_macro_is_a_structural_error() {
    assert_eq!(
        evaluate_error("text #REF_DSL(abc", &[]),
        EvalError::Structural {
            scope: "#REF_DSL".to_string(),
            offset: 17,
            message: "Macro is not closed".to_string(),
        }
    );
}

#[test]
fn test_unclosed_child_names_innermost_open_call() {
    let err = evaluate_error("#REF_DSL(f(#REF_THIS(g(x)", &[]);
    assert!(
        matches!(&err, EvalError::Structural { scope, .. } if scope == "#REF_THIS"),
        "{err:?}"
    );
}

#[test]
fn test_parameter_list_of_unknown_macro_is_echoed() {
    validate("#NOPE(#REF_DSL(x))", "#NOPE(#REF_DSL(x))", &[]);
    validate("#NOPE('a', #UUID())", "#NOPE('a', #UUID())", &[]);
}

#[test]
fn test_known_macro_in_loose_body_of_unknown_macro_is_expanded() {
    validate(
        "#NOPE(f(#REF_DSL(x)))",
        "#NOPE(f(r))",
        &[("REF_DSL", &["x"], "r")],
    );
}
