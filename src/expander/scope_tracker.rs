// MacroText
// Copyright (c) 2025 Harlen Batagelo
// https://github.com/hbatagelo/macrotext
// SPDX-License-Identifier: GPL-3.0-or-later

/// Decides whether a `)` closes the current macro call or belongs to
/// an unknown macro occurrence that is echoed as text.
///
/// `pending` counts unknown openings inside the current scope. Entering
/// a known call saves it and starts again from zero.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScopeTracker {
    pending: usize,
    saved: Vec<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseKind {
    /// Ends the innermost known call.
    Scope,
    /// Ends an unknown occurrence; the `)` is plain text.
    Literal,
    /// No scope left to close.
    Unmatched,
}

impl ScopeTracker {
    pub fn open(&mut self) {
        self.pending += 1;
    }

    pub fn close(&mut self) -> CloseKind {
        if self.pending > 0 {
            self.pending -= 1;
            return CloseKind::Literal;
        }
        match self.saved.pop() {
            Some(pending) => {
                self.pending = pending;
                CloseKind::Scope
            }
            None => CloseKind::Unmatched,
        }
    }

    pub fn go_deeper(&mut self) {
        self.saved.push(self.pending);
        self.pending = 0;
    }

    /// Number of known calls currently open.
    pub fn depth(&self) -> usize {
        self.saved.len()
    }
}
