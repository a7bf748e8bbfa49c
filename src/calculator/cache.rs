// MacroText
// Copyright (c) 2025 Harlen Batagelo
// https://github.com/hbatagelo/macrotext
// SPDX-License-Identifier: GPL-3.0-or-later

use std::{
    collections::HashMap,
    sync::{Arc, Mutex, PoisonError},
};

use crate::definition::MacroDefinition;

struct CacheEntry<T> {
    fingerprint: u64,
    artifact: Arc<T>,
}

/// Compiled artifacts keyed by macro name.
///
/// An entry is reused only while the fingerprint of the definition
/// matches; a changed body is compiled again. Compilation runs under
/// the lock, so a definition is compiled at most once per change even
/// when callers race.
pub struct CompileCache<T> {
    entries: Mutex<HashMap<String, CacheEntry<T>>>,
}

impl<T> Default for CompileCache<T> {
    fn default() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }
}

impl<T> CompileCache<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_compile<E>(
        &self,
        definition: &MacroDefinition,
        compile: impl FnOnce(&MacroDefinition) -> Result<T, E>,
    ) -> Result<Arc<T>, E> {
        let fingerprint = definition.fingerprint();
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);

        if let Some(entry) = entries.get(&definition.name) {
            if entry.fingerprint == fingerprint {
                return Ok(Arc::clone(&entry.artifact));
            }
            log::debug!("Macro '{}' changed; recompiling", definition.name);
        }

        let artifact = Arc::new(compile(definition)?);
        entries.insert(
            definition.name.clone(),
            CacheEntry {
                fingerprint,
                artifact: Arc::clone(&artifact),
            },
        );
        Ok(artifact)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
