// MacroText
// Copyright (c) 2025 Harlen Batagelo
// https://github.com/hbatagelo/macrotext
// SPDX-License-Identifier: GPL-3.0-or-later

//! Macro definitions as loaded from a catalog.

use serde::*;
use std::{
    collections::hash_map::DefaultHasher,
    hash::{Hash, Hasher},
};

/// A declared positional parameter of a macro.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct ParameterSpec {
    pub name: String,

    /// Optional parameters contribute nothing when their argument is absent.
    #[serde(default)]
    pub optional: bool,

    /// Substituted for an absent argument of a non-optional parameter.
    #[serde(default, rename = "default")]
    pub default_value: String,
}

impl ParameterSpec {
    pub fn required(name: impl Into<String>, default_value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            optional: false,
            default_value: default_value.into(),
        }
    }

    pub fn optional(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            optional: true,
            default_value: String::new(),
        }
    }
}

/// A named macro: the engine that runs it, its body, and its parameters.
///
/// Definitions are immutable once handed to a [`Registry`](crate::Registry).
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct MacroDefinition {
    pub name: String,

    /// Identifier of the computation engine, e.g. `rhai`.
    #[serde(default = "defaults::engine")]
    pub engine: String,

    #[serde(default)]
    pub body: String,

    #[serde(default)]
    pub parameters: Vec<ParameterSpec>,

    /// Project or scope the definition belongs to.
    #[serde(default)]
    pub owner: Option<String>,

    #[serde(default)]
    pub description: String,

    /// Marks internal helper macros. Informational only.
    #[serde(default)]
    pub technical: bool,
}

impl MacroDefinition {
    pub fn new(
        name: impl Into<String>,
        engine: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            engine: engine.into(),
            body: body.into(),
            parameters: Vec::new(),
            owner: None,
            description: String::new(),
            technical: false,
        }
    }

    pub fn with_parameter(mut self, parameter: ParameterSpec) -> Self {
        self.parameters.push(parameter);
        self
    }

    /// Hash of the engine identifier and body.
    ///
    /// Two definitions with the same fingerprint compile to the same artifact.
    pub fn fingerprint(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.engine.hash(&mut hasher);
        self.body.hash(&mut hasher);
        hasher.finish()
    }
}

pub mod defaults {
    pub fn engine() -> String {
        crate::calculator::DEFAULT_ENGINE.to_string()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_deserialize_with_defaults() {
        let definition: MacroDefinition = toml::from_str(
            r#"
name = "UPPER"
body = "fn main(text) { text.to_upper() }"

[[parameters]]
name = "text"
"#,
        )
        .unwrap();

        assert_eq!(definition.engine, "rhai");
        assert_eq!(definition.parameters, vec![ParameterSpec::required("text", "")]);
        assert_eq!(definition.owner, None);
        assert!(!definition.technical);
    }

    #[test]
    fn test_default_key_maps_to_default_value() {
        let parameter: ParameterSpec =
            serde_json::from_str(r#"{ "name": "a", "optional": false, "default": "X" }"#).unwrap();
        assert_eq!(parameter, ParameterSpec::required("a", "X"));
    }

    #[test]
    fn test_fingerprint_tracks_engine_and_body() {
        let a = MacroDefinition::new("A", "rhai", "fn main() { 1 }");
        let same_body = MacroDefinition::new("B", "rhai", "fn main() { 1 }");
        let other_body = MacroDefinition::new("A", "rhai", "fn main() { 2 }");
        let other_engine = MacroDefinition::new("A", "lua", "fn main() { 1 }");

        assert_eq!(a.fingerprint(), same_body.fingerprint());
        assert_ne!(a.fingerprint(), other_body.fingerprint());
        assert_ne!(a.fingerprint(), other_engine.fingerprint());
    }
}
