// MacroText
// Copyright (c) 2025 Harlen Batagelo
// https://github.com/hbatagelo/macrotext
// SPDX-License-Identifier: GPL-3.0-or-later

//! Computation of a single macro call.
//!
//! The expander only depends on the [`Calculator`] trait. The default
//! implementation, [`ScriptCalculator`], compiles macro bodies with a
//! script engine and caches the compiled artifacts.

mod cache;
mod script;

pub use cache::CompileCache;
pub use script::{ScriptCalculator, DEFAULT_ENGINE};

use thiserror::Error;

use crate::{
    context::Context,
    definition::{MacroDefinition, ParameterSpec},
};

#[derive(Debug, Error, PartialEq)]
pub enum CalculatorError {
    #[error("Error during compilation of {name} macros: {message}")]
    Compilation { name: String, message: String },

    #[error("Error during evaluation of {name} macros: {message}")]
    Invocation { name: String, message: String },

    #[error("Engine {engine} is not available for {name} macros")]
    UnknownEngine { name: String, engine: String },
}

/// Computes the result of one macro call from its definition, its
/// actual arguments, and the ambient context.
pub trait Calculator {
    fn calculate(
        &self,
        definition: &MacroDefinition,
        arguments: &[String],
        context: &Context,
    ) -> Result<String, CalculatorError>;
}

impl<F> Calculator for F
where
    F: Fn(&MacroDefinition, &[String], &Context) -> Result<String, CalculatorError>,
{
    fn calculate(
        &self,
        definition: &MacroDefinition,
        arguments: &[String],
        context: &Context,
    ) -> Result<String, CalculatorError> {
        self(definition, arguments, context)
    }
}

/// Arguments handed to a macro body, one per declared parameter.
///
/// - An actual argument is used with `\'` unescaped to `'`.
/// - A missing argument of a non-optional parameter takes its default.
/// - A missing argument of an optional parameter is omitted, shifting
///   later positions.
///
/// Actual arguments beyond the declared parameters are dropped.
pub fn effective_arguments(parameters: &[ParameterSpec], arguments: &[String]) -> Vec<String> {
    parameters
        .iter()
        .enumerate()
        .filter_map(|(i, parameter)| match arguments.get(i) {
            Some(argument) => Some(unescape_quotes(argument)),
            None if parameter.optional => None,
            None => Some(parameter.default_value.clone()),
        })
        .collect()
}

pub fn unescape_quotes(argument: &str) -> String {
    argument.replace("\\'", "'")
}
