// MacroText
// Copyright (c) 2025 Harlen Batagelo
// https://github.com/hbatagelo/macrotext
// SPDX-License-Identifier: GPL-3.0-or-later

use crate::definition::MacroDefinition;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FrameState {
    /// Accumulating output text.
    #[default]
    Idle,
    /// Accumulating arguments of a known call.
    Collecting,
}

/// Evaluation state of one call nesting level.
#[derive(Debug, Default)]
pub struct Frame<'r> {
    pub state: FrameState,
    pub output: Vec<String>,
    pub arguments: Vec<String>,
    pub definition: Option<&'r MacroDefinition>,
    /// Set when a child frame has been folded into the arguments.
    pub reduced: bool,
}

impl<'r> Frame<'r> {
    pub fn push_output(&mut self, text: impl Into<String>) {
        debug_assert_eq!(self.state, FrameState::Idle);
        self.output.push(text.into());
    }

    pub fn push_argument(&mut self, text: impl Into<String>) {
        debug_assert_eq!(self.state, FrameState::Collecting);
        self.arguments.push(text.into());
    }

    /// Pushes to output or arguments depending on the state.
    pub fn push(&mut self, text: impl Into<String>) {
        match self.state {
            FrameState::Idle => self.push_output(text),
            FrameState::Collecting => self.push_argument(text),
        }
    }

    pub fn begin_call(&mut self, definition: &'r MacroDefinition) {
        self.state = FrameState::Collecting;
        self.definition = Some(definition);
    }

    /// Moves the output of a finished child into the arguments.
    pub fn fold(&mut self, child: Frame<'r>) {
        self.arguments.extend(child.output);
        self.reduced = true;
    }

    pub fn finish_call(&mut self, result: String) {
        self.state = FrameState::Idle;
        self.definition = None;
        self.arguments.clear();
        self.reduced = false;
        self.output.push(result);
    }

    fn reset(&mut self) {
        self.state = FrameState::Idle;
        self.output.clear();
        self.arguments.clear();
        self.definition = None;
        self.reduced = false;
    }
}

/// Frames from the root (index 0) to the innermost call.
#[derive(Debug)]
pub struct FrameStack<'r> {
    frames: Vec<Frame<'r>>,
}

impl Default for FrameStack<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'r> FrameStack<'r> {
    pub fn new() -> Self {
        Self {
            frames: vec![Frame::default()],
        }
    }

    /// Drops every child and clears the root for a new pass.
    pub fn reset(&mut self) {
        self.frames.truncate(1);
        if let Some(root) = self.frames.first_mut() {
            root.reset();
        }
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn current(&self) -> &Frame<'r> {
        &self.frames[self.frames.len() - 1]
    }

    pub fn current_mut(&mut self) -> &mut Frame<'r> {
        let last = self.frames.len() - 1;
        &mut self.frames[last]
    }

    pub fn push_child(&mut self, definition: &'r MacroDefinition) {
        let mut child = Frame::default();
        child.begin_call(definition);
        self.frames.push(child);
    }

    /// Removes the innermost frame unless it is the root.
    pub fn pop_child(&mut self) -> Option<Frame<'r>> {
        if self.frames.len() > 1 {
            self.frames.pop()
        } else {
            None
        }
    }

    /// Innermost frame still collecting arguments.
    pub fn open_call(&self) -> Option<&'r MacroDefinition> {
        self.frames.iter().rev().find_map(|frame| frame.definition)
    }

    pub fn root_output(&self) -> String {
        self.frames[0].output.concat()
    }
}
