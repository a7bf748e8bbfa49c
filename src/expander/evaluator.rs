// MacroText
// Copyright (c) 2025 Harlen Batagelo
// https://github.com/hbatagelo/macrotext
// SPDX-License-Identifier: GPL-3.0-or-later

use function_name::named;
use owo_colors::OwoColorize;

use super::{frame::FrameStack, lexer, machine::FrameMachine, EvalError};
use crate::{
    calculator::{Calculator, ScriptCalculator},
    catalog::Settings,
    context::Context,
    definition::MacroDefinition,
    registry::Registry,
};

/// Expands macro occurrences in text until it stops changing.
///
/// Holds no per-evaluation state, so one evaluator can serve any number
/// of [`evaluate`](Self::evaluate) calls.
pub struct Evaluator<C = ScriptCalculator> {
    registry: Registry,
    calculator: C,
    settings: Settings,
}

impl<C: Calculator> Evaluator<C> {
    pub fn new(registry: Registry, calculator: C) -> Self {
        Self {
            registry,
            calculator,
            settings: Settings::default(),
        }
    }

    pub fn with_settings(mut self, settings: Settings) -> Self {
        self.settings = settings;
        self
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn calculator(&self) -> &C {
        &self.calculator
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Expands `text` with `context` visible to every macro call.
    ///
    /// Errors from the calculator do not abort the evaluation; their
    /// message replaces the failed call in the output.
    #[named]
    pub fn evaluate(&self, text: &str, context: &Context) -> Result<String, EvalError> {
        log::debug!(
            "{} {} byte(s)",
            function_name!().white().bold(),
            text.len()
        );
        self.resolve(text, context, 0)
    }

    /// Runs a single call through the calculator, rendering a failure
    /// as its message.
    pub fn calculate(
        &self,
        definition: &MacroDefinition,
        arguments: &[String],
        context: &Context,
    ) -> String {
        match self.calculator.calculate(definition, arguments, context) {
            Ok(result) => result,
            Err(err) => {
                log::error!("{err}");
                err.to_string()
            }
        }
    }

    /// Convergence loop. Nested evaluations run with `depth + 1`.
    pub(super) fn resolve(
        &self,
        text: &str,
        context: &Context,
        depth: usize,
    ) -> Result<String, EvalError> {
        if depth > self.settings.max_depth {
            return Err(EvalError::NestingTooDeep { depth });
        }

        let mut stack = FrameStack::new();
        let mut current = text.to_string();

        for pass in 1..=self.settings.max_passes {
            if current.is_empty() {
                return Ok(current);
            }

            stack.reset();
            let segments = match lexer::classify(&current) {
                Ok(segments) => segments,
                Err(err) => {
                    log::warn!("{err}; text left unexpanded");
                    return Ok(current);
                }
            };

            let candidate =
                FrameMachine::new(self, context, depth, &mut stack).walk(&segments, current.len())?;
            log::trace!("Pass {pass} at depth {depth}: {candidate:?}");

            if candidate == current {
                return Ok(current);
            }
            current = candidate;
        }

        Err(EvalError::RecursionBoundExceeded {
            passes: self.settings.max_passes,
        })
    }
}
