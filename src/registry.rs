// MacroText
// Copyright (c) 2025 Harlen Batagelo
// https://github.com/hbatagelo/macrotext
// SPDX-License-Identifier: GPL-3.0-or-later

//! Read-only lookup of macro definitions by name.

use std::collections::HashMap;

use crate::definition::MacroDefinition;

/// Name-keyed macro definitions, built once before an evaluation session.
#[derive(Clone, Debug, Default)]
pub struct Registry {
    macros: HashMap<String, MacroDefinition>,
}

impl Registry {
    /// Builds a registry from a list of definitions.
    /// A later definition replaces an earlier one with the same name.
    pub fn new(definitions: impl IntoIterator<Item = MacroDefinition>) -> Self {
        let mut macros = HashMap::new();
        for definition in definitions {
            if let Some(previous) = macros.insert(definition.name.clone(), definition) {
                log::debug!("Macro '{}' redefined", previous.name);
            }
        }
        Self { macros }
    }

    pub fn get(&self, name: &str) -> Option<&MacroDefinition> {
        self.macros.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.macros.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.macros.len()
    }

    pub fn is_empty(&self) -> bool {
        self.macros.is_empty()
    }

    /// Registered names in lexicographic order.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<_> = self.macros.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn definitions(&self) -> impl Iterator<Item = &MacroDefinition> {
        self.macros.values()
    }
}

impl FromIterator<MacroDefinition> for Registry {
    fn from_iter<I: IntoIterator<Item = MacroDefinition>>(iter: I) -> Self {
        Self::new(iter)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_lookup_by_name() {
        let registry = Registry::new(vec![
            MacroDefinition::new("REF_DSL", "rhai", ""),
            MacroDefinition::new("UUID", "rhai", ""),
        ]);

        assert!(registry.contains("UUID"));
        assert!(!registry.contains("uuid"));
        assert_eq!(registry.get("REF_DSL").map(|m| m.name.as_str()), Some("REF_DSL"));
        assert!(registry.get("MISSING").is_none());
        assert_eq!(registry.names(), vec!["REF_DSL", "UUID"]);
    }

    #[test]
    fn test_later_definition_wins() {
        let registry: Registry = [
            MacroDefinition::new("A", "rhai", "fn main() { 1 }"),
            MacroDefinition::new("A", "rhai", "fn main() { 2 }"),
        ]
        .into_iter()
        .collect();

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get("A").unwrap().body, "fn main() { 2 }");
    }

    #[test]
    fn test_empty_registry() {
        let registry = Registry::default();
        assert!(registry.is_empty());
        assert!(registry.names().is_empty());
    }
}
