// MacroText
// Copyright (c) 2025 Harlen Batagelo
// https://github.com/hbatagelo/macrotext
// SPDX-License-Identifier: GPL-3.0-or-later

//! Frame machine.
//!
//! Walks the segments of one pass. Every segment is dispatched on the
//! pair (segment kind, state of the innermost frame):
//!
//! | segment              | Idle                        | Collecting                 |
//! |----------------------|-----------------------------|----------------------------|
//! | known macro opening  | start call in this frame    | push child frame           |
//! | unknown opening      | echo to output              | push as argument           |
//! | parameter list       | echo to output              | resolve each element       |
//! | scope close          | fold child into parent, end | end call                   |
//! | literal close        | `)` to output               | `)` as argument            |
//! | anything else        | raw text to output          | raw text as argument       |
//!
//! Ending a call hands the arguments to the calculator and appends the
//! result to the output of the frame.

use super::{
    evaluator::Evaluator,
    frame::{FrameStack, FrameState},
    lexer::{ArgPiece, ParamElement, Segment, SegmentKind},
    scope_tracker::{CloseKind, ScopeTracker},
    EvalError,
};
use crate::{calculator::Calculator, context::Context};

pub(super) struct FrameMachine<'e, 's, C: Calculator> {
    evaluator: &'e Evaluator<C>,
    context: &'s Context,
    depth: usize,
    stack: &'s mut FrameStack<'e>,
    tracker: ScopeTracker,
}

impl<'e, 's, C: Calculator> FrameMachine<'e, 's, C> {
    pub fn new(
        evaluator: &'e Evaluator<C>,
        context: &'s Context,
        depth: usize,
        stack: &'s mut FrameStack<'e>,
    ) -> Self {
        Self {
            evaluator,
            context,
            depth,
            stack,
            tracker: ScopeTracker::default(),
        }
    }

    /// Walks `segments` and returns the root output.
    /// `end` is the length of the classified text.
    pub fn walk(mut self, segments: &[Segment], end: usize) -> Result<String, EvalError> {
        for segment in segments {
            self.step(segment)?;
        }

        if self.stack.len() > 1 || self.stack.current().state == FrameState::Collecting {
            return Err(EvalError::structural(
                self.scope_name(),
                end,
                "Macro is not closed",
            ));
        }
        Ok(self.stack.root_output())
    }

    fn step(&mut self, segment: &Segment) -> Result<(), EvalError> {
        let state = self.stack.current().state;
        match (&segment.kind, state) {
            (SegmentKind::MacroOpen { name, raw }, _) => self.open(name, raw, state),
            (SegmentKind::MacroClose, _) => return self.close(segment.offset, state),
            (SegmentKind::ParamList { elements, .. }, FrameState::Collecting) => {
                for element in elements {
                    self.push_element(element)?;
                }
            }
            (_, FrameState::Collecting) => self.stack.current_mut().push_argument(segment.raw()),
            (_, FrameState::Idle) => self.stack.current_mut().push_output(segment.raw()),
        }
        Ok(())
    }

    fn open(&mut self, name: &str, raw: &str, state: FrameState) {
        match self.evaluator.registry().get(name) {
            Some(definition) => {
                match state {
                    FrameState::Idle => self.stack.current_mut().begin_call(definition),
                    FrameState::Collecting => self.stack.push_child(definition),
                }
                self.tracker.go_deeper();
            }
            None => {
                self.stack.current_mut().push(raw);
                self.tracker.open();
            }
        }
    }

    fn close(&mut self, offset: usize, state: FrameState) -> Result<(), EvalError> {
        match self.tracker.close() {
            CloseKind::Literal => {
                self.stack.current_mut().push(")");
                Ok(())
            }
            CloseKind::Unmatched => Err(self.unexpected_close(offset)),
            CloseKind::Scope => match state {
                FrameState::Collecting => self.end_call(offset),
                FrameState::Idle => {
                    let Some(child) = self.stack.pop_child() else {
                        return Err(self.unexpected_close(offset));
                    };
                    self.stack.current_mut().fold(child);
                    self.end_call(offset)
                }
            },
        }
    }

    fn end_call(&mut self, offset: usize) -> Result<(), EvalError> {
        let frame = self.stack.current_mut();
        let Some(definition) = frame.definition else {
            return Err(EvalError::structural("text", offset, "Macro ending without a call"));
        };
        let mut arguments = std::mem::take(&mut frame.arguments);

        if frame.reduced {
            let joined = arguments.concat();
            arguments = vec![self.evaluator.resolve(&joined, self.context, self.depth + 1)?];
        }

        let result = self
            .evaluator
            .calculate(definition, &arguments, self.context);
        self.stack.current_mut().finish_call(result);
        Ok(())
    }

    /// Expands nested occurrences of an element in order, then expands
    /// the concatenation once more. Empty elements add no argument.
    fn push_element(&mut self, element: &ParamElement) -> Result<(), EvalError> {
        let mut value = String::new();
        for piece in &element.pieces {
            match piece {
                ArgPiece::Text(text) => value.push_str(text),
                ArgPiece::Macro(occurrence) => value.push_str(&self.evaluator.resolve(
                    occurrence,
                    self.context,
                    self.depth + 1,
                )?),
            }
        }

        if !value.is_empty() {
            let resolved = self
                .evaluator
                .resolve(&value, self.context, self.depth + 1)?;
            self.stack.current_mut().push_argument(resolved);
        }
        Ok(())
    }

    fn scope_name(&self) -> String {
        self.stack
            .open_call()
            .map_or_else(|| "text".to_string(), |definition| format!("#{}", definition.name))
    }

    fn unexpected_close(&self, offset: usize) -> EvalError {
        EvalError::structural(self.scope_name(), offset, "Unexpected macro ending")
    }
}
