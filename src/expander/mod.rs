// MacroText
// Copyright (c) 2025 Harlen Batagelo
// https://github.com/hbatagelo/macrotext
// SPDX-License-Identifier: GPL-3.0-or-later

//! Macro expansion engine.
//!
//! Expansion of a text is a sequence of passes. Each pass:
//! - classifies the text into segments ([`lexer`]),
//! - walks the segments through a stack of frames, delegating each
//!   completed call to the calculator ([`machine`]),
//! - produces a candidate text.
//!
//! Passes repeat until a candidate equals its input, so macros may
//! return text that contains further macro occurrences.
//!
//! The main entry point is [`Evaluator::evaluate`].

#[cfg(test)]
mod tests {
    mod evaluator;
    mod lexer;
    mod machine;
    mod scope_tracker;
    mod support;
}
mod evaluator;
mod frame;
pub mod lexer;
mod machine;
mod scope_tracker;

pub use evaluator::Evaluator;
pub use scope_tracker::{CloseKind, ScopeTracker};

use thiserror::Error;

/// Fatal expansion errors. Calculator failures are not fatal and are
/// rendered inline instead.
#[derive(Debug, Error, PartialEq)]
pub enum EvalError {
    #[error("Structural error in {scope} at byte {offset}: {message}")]
    Structural {
        /// Macro name (`#NAME`) of the innermost open call, or `text`.
        scope: String,
        offset: usize,
        message: String,
    },

    #[error("Text did not converge after {passes} passes")]
    RecursionBoundExceeded { passes: usize },

    #[error("Nested evaluation exceeded depth {depth}")]
    NestingTooDeep { depth: usize },
}

impl EvalError {
    pub(crate) fn structural(
        scope: impl Into<String>,
        offset: usize,
        message: impl Into<String>,
    ) -> Self {
        Self::Structural {
            scope: scope.into(),
            offset,
            message: message.into(),
        }
    }
}
