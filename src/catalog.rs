// MacroText
// Copyright (c) 2025 Harlen Batagelo
// https://github.com/hbatagelo/macrotext
// SPDX-License-Identifier: GPL-3.0-or-later

//! Macro catalogs and evaluation settings.
//!
//! A catalog is a TOML or JSON document holding an optional
//! `[settings]` table and a list of `[[macros]]`. Catalogs can be
//! merged; a macro defined by a later catalog replaces an earlier one
//! with the same name.

use serde::*;
use std::{
    collections::HashSet,
    fs, io,
    path::{Path, PathBuf},
};
use thiserror::Error;

use crate::{definition::MacroDefinition, registry::Registry, APP_NAME};

const BUILTIN_CATALOG: &str = include_str!("../data/builtin.toml");

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("I/O error")]
    Io(#[from] io::Error),
    #[error("TOML parse error")]
    TomlParse(#[from] toml::de::Error),
    #[error("JSON parse error")]
    JsonParse(#[from] serde_json::Error),
    #[error("Catalog not found: {0}")]
    NotFound(PathBuf),
}

/// Limits applied while expanding text and running macro bodies.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Serialize)]
pub struct Settings {
    /// Upper bound on convergence passes per evaluation.
    #[serde(
        default = "defaults::max_passes",
        deserialize_with = "validators::clamp_max_passes"
    )]
    pub max_passes: usize,

    /// Upper bound on nested sub-evaluations.
    #[serde(
        default = "defaults::max_depth",
        deserialize_with = "validators::clamp_max_depth"
    )]
    pub max_depth: usize,

    /// Operation budget for a single script call. Zero means unlimited.
    #[serde(default = "defaults::max_operations")]
    pub max_operations: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            max_passes: defaults::max_passes(),
            max_depth: defaults::max_depth(),
            max_operations: defaults::max_operations(),
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct Catalog {
    #[serde(default)]
    pub settings: Option<Settings>,

    #[serde(default)]
    pub macros: Vec<MacroDefinition>,
}

/// JSON catalogs may also be a bare list of definitions.
/// The list form is tried first since a struct also accepts a sequence.
#[derive(Deserialize)]
#[serde(untagged)]
enum JsonCatalog {
    List(Vec<MacroDefinition>),
    Full(Catalog),
}

impl Catalog {
    pub fn from_toml_str(content: &str) -> Result<Self, CatalogError> {
        Ok(toml::from_str(content)?)
    }

    pub fn from_json_str(content: &str) -> Result<Self, CatalogError> {
        Ok(match serde_json::from_str(content)? {
            JsonCatalog::Full(catalog) => catalog,
            JsonCatalog::List(macros) => Self {
                settings: None,
                macros,
            },
        })
    }

    pub fn from_toml_file(path: &Path) -> Result<Self, CatalogError> {
        Self::from_toml_str(&fs::read_to_string(path)?)
    }

    pub fn from_json_file(path: &Path) -> Result<Self, CatalogError> {
        Self::from_json_str(&fs::read_to_string(path)?)
    }

    /// Loads a catalog, choosing the format by extension.
    ///
    /// Files without a known extension are tried as TOML, then JSON.
    pub fn from_file(path: &Path) -> Result<Self, CatalogError> {
        if !path.exists() {
            return Err(CatalogError::NotFound(path.to_path_buf()));
        }

        let catalog = match path.extension().and_then(|s| s.to_str()) {
            Some("toml") => Self::from_toml_file(path)?,
            Some("json") => Self::from_json_file(path)?,
            _ => Self::from_toml_file(path).or_else(|_| Self::from_json_file(path))?,
        };
        log::info!("Loaded {} macro(s) from {}", catalog.macros.len(), path.display());
        Ok(catalog)
    }

    /// Macros bundled with the crate.
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_toml_str(BUILTIN_CATALOG)
    }

    /// Appends `other`, letting its macros and settings take precedence.
    pub fn merge(&mut self, other: Catalog) {
        let existing: HashSet<_> = self.macros.iter().map(|m| m.name.clone()).collect();
        for definition in &other.macros {
            if existing.contains(&definition.name) {
                log::warn!("Macro '{}' overridden by a later catalog", definition.name);
            }
        }
        self.macros.extend(other.macros);
        if other.settings.is_some() {
            self.settings = other.settings;
        }
    }

    pub fn settings(&self) -> Settings {
        self.settings.unwrap_or_default()
    }

    pub fn registry(&self) -> Registry {
        Registry::new(self.macros.iter().cloned())
    }
}

/// Location of the per-user catalog, loaded when present.
pub fn default_catalog_path() -> PathBuf {
    fn fallback_dir() -> PathBuf {
        std::env::current_dir().unwrap_or_default()
    }

    dirs::data_local_dir()
        .map(|p| p.join(APP_NAME))
        .unwrap_or_else(|| {
            log::warn!(
                "Could not find $XDG_DATA_HOME or $HOME/.local/share; using current directory."
            );
            fallback_dir()
        })
        .join("catalog.toml")
}

pub mod defaults {
    pub fn max_passes() -> usize {
        10
    }

    pub fn max_depth() -> usize {
        16
    }

    pub fn max_operations() -> u64 {
        1_000_000
    }
}

mod validators {
    use super::*;

    pub fn clamp_max_passes<'de, D>(deserializer: D) -> Result<usize, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = usize::deserialize(deserializer)?;
        Ok(value.clamp(1, 100))
    }

    pub fn clamp_max_depth<'de, D>(deserializer: D) -> Result<usize, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = usize::deserialize(deserializer)?;
        Ok(value.clamp(1, 256))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_empty_catalog_uses_default_settings() {
        let catalog = Catalog::from_toml_str("").unwrap();
        assert_eq!(catalog.settings(), Settings::default());
        assert_eq!(catalog.settings().max_passes, 10);
        assert!(catalog.macros.is_empty());
    }

    #[test]
    fn test_settings_are_clamped() {
        let catalog = Catalog::from_toml_str(
            r#"
[settings]
max_passes = 0
max_depth = 1000
"#,
        )
        .unwrap();

        let settings = catalog.settings();
        assert_eq!(settings.max_passes, 1);
        assert_eq!(settings.max_depth, 256);
        assert_eq!(settings.max_operations, 1_000_000);
    }

    #[test]
    fn test_toml_macros() {
        let catalog = Catalog::from_toml_str(
            r#"
[[macros]]
name = "GREETING"
body = '''fn main(who) { "Hello, " + who }'''
parameters = [{ name = "who", default = "world" }]
owner = "demo"
"#,
        )
        .unwrap();

        let definition = &catalog.macros[0];
        assert_eq!(definition.name, "GREETING");
        assert_eq!(definition.engine, "rhai");
        assert_eq!(definition.parameters[0].default_value, "world");
        assert_eq!(definition.owner.as_deref(), Some("demo"));
    }

    #[test]
    fn test_json_catalog_as_object_or_list() {
        let full = Catalog::from_json_str(
            r#"{ "settings": { "max_passes": 3 }, "macros": [ { "name": "A" } ] }"#,
        )
        .unwrap();
        assert_eq!(full.settings().max_passes, 3);
        assert_eq!(full.macros.len(), 1);

        let list = Catalog::from_json_str(r#"[ { "name": "A" }, { "name": "B" } ]"#).unwrap();
        assert_eq!(list.settings, None);
        assert_eq!(list.registry().names(), vec!["A", "B"]);

        let single = Catalog::from_json_str(r#"[ { "name": "A" } ]"#).unwrap();
        assert_eq!(single.settings, None);
        assert_eq!(single.macros.len(), 1);
    }

    #[test]
    fn test_merge_later_wins() {
        let mut catalog = Catalog::from_toml_str(
            r#"
[[macros]]
name = "A"
body = "fn main() { 1 }"
"#,
        )
        .unwrap();

        catalog.merge(
            Catalog::from_toml_str(
                r#"
[settings]
max_depth = 4

[[macros]]
name = "A"
body = "fn main() { 2 }"
"#,
            )
            .unwrap(),
        );
        catalog.merge(Catalog::default());

        let registry = catalog.registry();
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get("A").unwrap().body, "fn main() { 2 }");
        assert_eq!(catalog.settings().max_depth, 4);
    }

    #[test]
    fn test_builtin_catalog_parses() {
        let catalog = Catalog::builtin().unwrap();
        let registry = catalog.registry();
        for name in ["CONTEXT", "UPPERCASE", "LOWERCASE", "CONCAT", "IF_EMPTY", "REPEAT"] {
            assert!(registry.contains(name), "missing builtin {name}");
        }
    }

    #[test]
    fn test_missing_file() {
        let result = Catalog::from_file(Path::new("/nonexistent/catalog.toml"));
        assert!(matches!(result, Err(CatalogError::NotFound(_))));
    }

    #[test]
    fn test_default_catalog_path() {
        let path = default_catalog_path();
        assert!(path.ends_with("catalog.toml"));
    }
}
