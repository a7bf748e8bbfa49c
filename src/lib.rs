// MacroText
// Copyright (c) 2025 Harlen Batagelo
// https://github.com/hbatagelo/macrotext
// SPDX-License-Identifier: GPL-3.0-or-later

//! Inline macro expansion for free-form text.
//!
//! Test scripts, SQL fragments, and data templates may embed macro
//! occurrences such as `#NAME(a, b)` or `$NAME('quoted', #INNER(x))`.
//! This crate expands them:
//!
//! - [`expander`] classifies text into segments, tracks macro scopes,
//!   folds nested calls, and repeats passes until the text converges.
//! - [`calculator`] computes the result of a single call; the default
//!   [`ScriptCalculator`] runs macro bodies written in Rhai.
//! - [`registry`] and [`catalog`] supply the macro definitions.
//!
//! The main entry point is [`Evaluator::evaluate`].

pub mod calculator;
pub mod catalog;
pub mod context;
pub mod definition;
pub mod expander;
pub mod registry;

pub use calculator::{Calculator, CalculatorError, ScriptCalculator};
pub use catalog::{Catalog, CatalogError, Settings};
pub use context::Context;
pub use definition::{MacroDefinition, ParameterSpec};
pub use expander::{EvalError, Evaluator};
pub use registry::Registry;

pub const APP_NAME: &str = "macrotext";
pub const APP_ABOUT: &str = "Inline macro expansion for test scripts and data templates";
pub const APP_AUTHOR: &str = "Harlen Batagelo, hbatagelo@gmail.com";
pub const APP_SEMVER: &str = "1.0.0";
