// MacroText
// Copyright (c) 2025 Harlen Batagelo
// https://github.com/hbatagelo/macrotext
// SPDX-License-Identifier: GPL-3.0-or-later

//! Script-backed calculator.
//!
//! A macro body is a Rhai script defining `fn main(...)`. A call runs
//! `main` with one string per effective argument. Inside the body:
//! - `this` is the ambient context as an object map,
//! - the constants `args` and `contextMap` are visible to top-level
//!   statements.
//!
//! The result is rendered with its display form, so `()` becomes an
//! empty string.

use function_name::named;
use owo_colors::OwoColorize;
use rhai::{Array, CallFnOptions, Dynamic, Engine, Scope, AST};
use std::{collections::HashMap, sync::Arc};

use super::{effective_arguments, Calculator, CalculatorError, CompileCache};
use crate::{catalog::Settings, context::Context, definition::MacroDefinition};

pub const DEFAULT_ENGINE: &str = "rhai";

pub struct ScriptCalculator {
    engines: HashMap<String, Engine>,
    cache: CompileCache<AST>,
}

impl Default for ScriptCalculator {
    fn default() -> Self {
        Self::new(&Settings::default())
    }
}

impl ScriptCalculator {
    pub fn new(settings: &Settings) -> Self {
        let mut engine = Engine::new();
        engine.set_max_operations(settings.max_operations);

        Self {
            engines: HashMap::from([(DEFAULT_ENGINE.to_string(), engine)]),
            cache: CompileCache::new(),
        }
    }

    /// Registers an engine under `id`, replacing any engine with that id.
    pub fn with_engine(mut self, id: impl Into<String>, engine: Engine) -> Self {
        self.engines.insert(id.into(), engine);
        self
    }

    pub fn cache(&self) -> &CompileCache<AST> {
        &self.cache
    }

    fn engine(&self, definition: &MacroDefinition) -> Result<&Engine, CalculatorError> {
        self.engines
            .get(&definition.engine)
            .ok_or_else(|| CalculatorError::UnknownEngine {
                name: definition.name.clone(),
                engine: definition.engine.clone(),
            })
    }

    /// Compiles the body of `definition`, reusing a cached artifact
    /// while the body is unchanged.
    #[named]
    pub fn compile(&self, definition: &MacroDefinition) -> Result<Arc<AST>, CalculatorError> {
        let engine = self.engine(definition)?;
        self.cache.get_or_compile(definition, |definition| {
            log::debug!(
                "{} {}",
                function_name!().white().bold(),
                definition.name
            );
            engine
                .compile(&definition.body)
                .map_err(|err| CalculatorError::Compilation {
                    name: definition.name.clone(),
                    message: err.to_string(),
                })
        })
    }
}

impl Calculator for ScriptCalculator {
    fn calculate(
        &self,
        definition: &MacroDefinition,
        arguments: &[String],
        context: &Context,
    ) -> Result<String, CalculatorError> {
        let engine = self.engine(definition)?;
        let ast = self.compile(definition)?;
        let arguments = effective_arguments(&definition.parameters, arguments);

        let invocation_error = |message: String| CalculatorError::Invocation {
            name: definition.name.clone(),
            message,
        };

        let mut this =
            rhai::serde::to_dynamic(context).map_err(|err| invocation_error(err.to_string()))?;

        let mut scope = Scope::new();
        scope.push_constant(
            "args",
            arguments
                .iter()
                .cloned()
                .map(Dynamic::from)
                .collect::<Array>(),
        );
        scope.push_constant_dynamic("contextMap", this.clone());

        let options = CallFnOptions::new().bind_this_ptr(&mut this);
        let result = engine
            .call_fn_with_options::<Dynamic>(options, &mut scope, &ast, "main", arguments)
            .map_err(|err| invocation_error(err.to_string()))?;

        Ok(result.to_string())
    }
}
