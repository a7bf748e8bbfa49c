// MacroText
// Copyright (c) 2025 Harlen Batagelo
// https://github.com/hbatagelo/macrotext
// SPDX-License-Identifier: GPL-3.0-or-later

//! Segment classification.
//!
//! Splits text into an ordered list of [`Segment`]s whose raw texts
//! concatenate back to the input. A macro occurrence starts with `#` or
//! `$`, an identifier, and `(`.
//!
//! After every macro opening the lexer tries to read a well-formed
//! parameter list up to the matching `)`. Each element is either quoted
//! (`'…'`, surrounded by optional whitespace) or bare (no plain
//! parentheses). Nested occurrences inside an element are kept whole as
//! [`ArgPiece::Macro`]. When the list is not well formed, the call body
//! is split loosely into text, quotes, escapes, and nested occurrences,
//! and the first unbalanced `)` closes the call.
//!
//! Outside of any call, quotes and parentheses are plain text.

use regex::Regex;
use std::{collections::HashMap, sync::LazyLock};
use thiserror::Error;

static MACRO_OPEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[#$]([A-Za-z0-9_]+)\(").expect("Invalid macro pattern"));

#[derive(Debug, Error, PartialEq)]
pub enum LexError {
    #[error("Segments do not cover the input at byte {0}")]
    Coverage(usize),
}

/// Part of a parameter list element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArgPiece {
    Text(String),
    /// A complete nested occurrence, e.g. `#NAME(a, b)`.
    Macro(String),
}

/// One comma-separated element of a well-formed parameter list.
/// Quotes around quoted elements are not part of the pieces.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParamElement {
    pub pieces: Vec<ArgPiece>,
}

impl ParamElement {
    fn push_text(&mut self, text: &str) {
        if !text.is_empty() {
            self.pieces.push(ArgPiece::Text(text.to_string()));
        }
    }

    pub fn is_empty(&self) -> bool {
        self.pieces.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SegmentKind {
    Text(String),
    /// A quoted run inside a loosely split call body, quotes included.
    Quote(String),
    /// A backslash and the character after it.
    Escape(String),
    MacroOpen {
        name: String,
        raw: String,
    },
    ParamList {
        raw: String,
        elements: Vec<ParamElement>,
    },
    MacroClose,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub kind: SegmentKind,
    /// Byte offset of the segment in the classified text.
    pub offset: usize,
}

impl Segment {
    /// The exact input text covered by this segment.
    pub fn raw(&self) -> &str {
        match &self.kind {
            SegmentKind::Text(text) | SegmentKind::Quote(text) | SegmentKind::Escape(text) => text,
            SegmentKind::MacroOpen { raw, .. } | SegmentKind::ParamList { raw, .. } => raw,
            SegmentKind::MacroClose => ")",
        }
    }
}

/// Classifies `source` into segments.
pub fn classify(source: &str) -> Result<Vec<Segment>, LexError> {
    let segments = Lexer::new(source).run();

    let mut offset = 0;
    for segment in &segments {
        let covered = segment.offset == offset
            && source
                .get(offset..)
                .is_some_and(|rest| rest.starts_with(segment.raw()));
        if !covered {
            return Err(LexError::Coverage(offset));
        }
        offset += segment.raw().len();
    }
    if offset != source.len() {
        return Err(LexError::Coverage(offset));
    }

    Ok(segments)
}

struct Lexer<'a> {
    source: &'a str,
    bytes: &'a [u8],
    pos: usize,
    text_start: Option<usize>,
    /// Plain parenthesis depth of each loosely split call still open.
    loose: Vec<usize>,
    scanner: Scanner<'a>,
    segments: Vec<Segment>,
}

impl<'a> Lexer<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            source,
            bytes: source.as_bytes(),
            pos: 0,
            text_start: None,
            loose: Vec::new(),
            scanner: Scanner::new(source),
            segments: Vec::new(),
        }
    }

    fn run(mut self) -> Vec<Segment> {
        while self.pos < self.bytes.len() {
            match self.bytes[self.pos] {
                b'\\' => {
                    let len = escape_len(self.source, self.pos);
                    let raw = self.source[self.pos..self.pos + len].to_string();
                    self.emit(len, SegmentKind::Escape(raw));
                }
                b'#' | b'$' => match match_open(self.source, self.pos) {
                    Some((name, len)) => self.open_macro(name, len),
                    None => self.advance_text(),
                },
                b'(' if self.in_loose_call() => {
                    if let Some(depth) = self.loose.last_mut() {
                        *depth += 1;
                    }
                    self.advance_text();
                }
                b')' if self.in_loose_call() => self.close_paren(),
                b'\'' if self.in_loose_call() => match self.scanner.quoted_element(self.pos) {
                    Some((_, end)) => {
                        let raw = self.source[self.pos..end].to_string();
                        self.emit(end - self.pos, SegmentKind::Quote(raw));
                    }
                    None => self.advance_text(),
                },
                _ => self.advance_text(),
            }
        }
        self.flush_text();
        self.segments
    }

    fn in_loose_call(&self) -> bool {
        !self.loose.is_empty()
    }

    fn advance_text(&mut self) {
        self.text_start.get_or_insert(self.pos);
        self.pos += char_len_at(self.source, self.pos);
    }

    fn flush_text(&mut self) {
        if let Some(start) = self.text_start.take() {
            self.segments.push(Segment {
                kind: SegmentKind::Text(self.source[start..self.pos].to_string()),
                offset: start,
            });
        }
    }

    fn emit(&mut self, len: usize, kind: SegmentKind) {
        self.flush_text();
        self.segments.push(Segment {
            kind,
            offset: self.pos,
        });
        self.pos += len;
    }

    fn open_macro(&mut self, name: &str, open_len: usize) {
        let raw = self.source[self.pos..self.pos + open_len].to_string();
        self.emit(
            open_len,
            SegmentKind::MacroOpen {
                name: name.to_string(),
                raw,
            },
        );

        match self.scanner.param_list(self.pos) {
            Some((elements, close)) => {
                if close > self.pos {
                    let raw = self.source[self.pos..close].to_string();
                    self.emit(close - self.pos, SegmentKind::ParamList { raw, elements });
                }
                self.emit(1, SegmentKind::MacroClose);
            }
            None => self.loose.push(0),
        }
    }

    fn close_paren(&mut self) {
        let nested = self.loose.last().is_some_and(|depth| *depth > 0);
        if nested {
            if let Some(depth) = self.loose.last_mut() {
                *depth -= 1;
            }
            self.advance_text();
        } else {
            self.loose.pop();
            self.emit(1, SegmentKind::MacroClose);
        }
    }
}

/// Parameter lists nested deeper than this inside one list are read as
/// malformed, which sends the outer call to the loose split.
pub const MAX_LIST_DEPTH: usize = 128;

/// Elements and closing `)` position of a well-formed list.
type ListScan = Option<(Vec<ParamElement>, usize)>;

/// Well-formed parameter list reader.
///
/// Each list start is scanned once per [`classify`] call. Quoted and
/// bare readings of the same element, and every enclosing list, reuse
/// the cached result of a nested occurrence.
struct Scanner<'a> {
    source: &'a str,
    bytes: &'a [u8],
    lists: HashMap<usize, ListScan>,
    depth: usize,
}

impl<'a> Scanner<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            source,
            bytes: source.as_bytes(),
            lists: HashMap::new(),
            depth: 0,
        }
    }

    /// End (exclusive) of a complete macro occurrence starting at `pos`.
    fn occurrence_end(&mut self, pos: usize) -> Option<usize> {
        let (_, open_len) = match_open(self.source, pos)?;
        let start = pos + open_len;
        if !self.lists.contains_key(&start) {
            self.param_list(start)?;
        }
        self.lists
            .get(&start)
            .and_then(Option::as_ref)
            .map(|(_, close)| close + 1)
    }

    /// Reads a well-formed parameter list starting right after `(`.
    /// Returns the elements and the position of the closing `)`.
    fn param_list(&mut self, start: usize) -> ListScan {
        if let Some(scan) = self.lists.get(&start) {
            return scan.clone();
        }
        // Not cached: the same start may still be well formed when read
        // from a shallower list.
        if self.depth >= MAX_LIST_DEPTH {
            return None;
        }

        self.depth += 1;
        let scan = self.read_list(start);
        self.depth -= 1;

        self.lists.insert(start, scan.clone());
        scan
    }

    fn read_list(&mut self, start: usize) -> ListScan {
        let mut elements = Vec::new();
        let mut pos = start;
        loop {
            let (element, next) = self.element(pos)?;
            elements.push(element);
            if self.bytes[next] == b')' {
                return Some((elements, next));
            }
            pos = next + 1;
        }
    }

    /// Reads one element; the returned position is at `,` or `)`.
    fn element(&mut self, start: usize) -> Option<(ParamElement, usize)> {
        let content = skip_whitespace(self.bytes, start);
        if self.bytes.get(content) == Some(&b'\'') {
            if let Some((element, after)) = self.quoted_element(content) {
                let next = skip_whitespace(self.bytes, after);
                if matches!(self.bytes.get(next), Some(b',' | b')')) {
                    return Some((element, next));
                }
            }
        }
        self.bare_element(start)
    }

    /// Reads `'…'` starting at the opening quote. Returns the position
    /// after the closing quote.
    fn quoted_element(&mut self, quote: usize) -> Option<(ParamElement, usize)> {
        let mut element = ParamElement::default();
        let mut text_start = quote + 1;
        let mut pos = text_start;
        loop {
            match *self.bytes.get(pos)? {
                b'\'' => {
                    element.push_text(&self.source[text_start..pos]);
                    return Some((element, pos + 1));
                }
                b'\\' => pos += escape_len(self.source, pos),
                b'#' | b'$' => match self.occurrence_end(pos) {
                    Some(end) => {
                        element.push_text(&self.source[text_start..pos]);
                        element
                            .pieces
                            .push(ArgPiece::Macro(self.source[pos..end].to_string()));
                        pos = end;
                        text_start = pos;
                    }
                    None => pos += 1,
                },
                _ => pos += char_len_at(self.source, pos),
            }
        }
    }

    fn bare_element(&mut self, start: usize) -> Option<(ParamElement, usize)> {
        let mut element = ParamElement::default();
        let mut text_start = start;
        let mut pos = start;
        loop {
            match *self.bytes.get(pos)? {
                b',' | b')' => {
                    element.push_text(&self.source[text_start..pos]);
                    return Some((element, pos));
                }
                b'(' => return None,
                b'\\' => pos += escape_len(self.source, pos),
                b'#' | b'$' => match self.occurrence_end(pos) {
                    Some(end) => {
                        element.push_text(&self.source[text_start..pos]);
                        element
                            .pieces
                            .push(ArgPiece::Macro(self.source[pos..end].to_string()));
                        pos = end;
                        text_start = pos;
                    }
                    None => pos += 1,
                },
                _ => pos += char_len_at(self.source, pos),
            }
        }
    }
}

fn char_len_at(source: &str, pos: usize) -> usize {
    source[pos..].chars().next().map_or(1, char::len_utf8)
}

fn escape_len(source: &str, pos: usize) -> usize {
    if pos + 1 < source.len() {
        1 + char_len_at(source, pos + 1)
    } else {
        1
    }
}

fn skip_whitespace(bytes: &[u8], mut pos: usize) -> usize {
    while bytes.get(pos).is_some_and(u8::is_ascii_whitespace) {
        pos += 1;
    }
    pos
}

/// Name and length of a macro opening (`#NAME(`) starting at `pos`.
fn match_open(source: &str, pos: usize) -> Option<(&str, usize)> {
    let captures = MACRO_OPEN.captures(&source[pos..])?;
    let name = captures.get(1)?.as_str();
    let len = captures.get(0)?.len();
    Some((name, len))
}
