use pretty_assertions::assert_eq;

use super::super::{effective_arguments, unescape_quotes};
use crate::definition::ParameterSpec;

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

#[test]
fn test_actual_arguments_win() {
    let parameters = vec![
        ParameterSpec::required("a", "X"),
        ParameterSpec::optional("b"),
    ];
    assert_eq!(
        effective_arguments(&parameters, &strings(&["1", "2"])),
        strings(&["1", "2"])
    );
}

#[test]
fn test_mandatory_defaults_fill_missing_arguments() {
    let parameters = vec![
        ParameterSpec::required("first", "1"),
        ParameterSpec::required("second", "2"),
    ];
    assert_eq!(effective_arguments(&parameters, &[]), strings(&["1", "2"]));
    assert_eq!(
        effective_arguments(&parameters, &strings(&["a"])),
        strings(&["a", "2"])
    );
}

#[test]
fn test_missing_optional_arguments_are_omitted() {
    let parameters = vec![
        ParameterSpec::required("a", "X"),
        ParameterSpec::optional("b"),
    ];
    assert_eq!(effective_arguments(&parameters, &[]), strings(&["X"]));

    let parameters = vec![
        ParameterSpec::optional("a"),
        ParameterSpec::required("b", "B"),
    ];
    assert_eq!(effective_arguments(&parameters, &[]), strings(&["B"]));
}

#[test]
fn test_extra_arguments_are_dropped() {
    let parameters = vec![ParameterSpec::required("a", "")];
    assert_eq!(
        effective_arguments(&parameters, &strings(&["1", "2", "3"])),
        strings(&["1"])
    );
    assert!(effective_arguments(&[], &strings(&["1"])).is_empty());
}

#[test]
fn test_escaped_quotes_are_unescaped() {
    assert_eq!(
        unescape_quotes(r"yyyy-MM-dd\'T\'HH:mm:ss.SSS\'Z\'"),
        "yyyy-MM-dd'T'HH:mm:ss.SSS'Z'"
    );

    let parameters = vec![ParameterSpec::required("format", "")];
    assert_eq!(
        effective_arguments(&parameters, &strings(&[r"Ben\'s"])),
        strings(&["Ben's"])
    );
}

#[test]
fn test_other_escapes_are_kept() {
    assert_eq!(unescape_quotes(r"C:\path\to"), r"C:\path\to");
}
