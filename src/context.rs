// MacroText
// Copyright (c) 2025 Harlen Batagelo
// https://github.com/hbatagelo/macrotext
// SPDX-License-Identifier: GPL-3.0-or-later

//! Ambient key-value context handed to every macro call.
//!
//! The shape of the context belongs to the calling application; the
//! expander only passes it through to the calculator.

use serde_json::Value;
use std::{
    fs, io,
    path::{Path, PathBuf},
};
use thiserror::Error;

/// Flat name-to-value mapping. Values may be nested JSON.
pub type Context = serde_json::Map<String, Value>;

#[derive(Debug, Error)]
pub enum ContextError {
    #[error("I/O error")]
    Io(#[from] io::Error),
    #[error("JSON parse error")]
    JsonParse(#[from] serde_json::Error),
    #[error("Context file {0} is not a JSON object")]
    NotAnObject(PathBuf),
    #[error("Expected KEY=VALUE, got '{0}'")]
    InvalidAssignment(String),
}

pub fn from_json_str(json: &str) -> Result<Context, serde_json::Error> {
    serde_json::from_str(json)
}

pub fn from_json_file(path: &Path) -> Result<Context, ContextError> {
    let content = fs::read_to_string(path)?;
    match serde_json::from_str::<Value>(&content)? {
        Value::Object(map) => Ok(map),
        _ => Err(ContextError::NotAnObject(path.to_path_buf())),
    }
}

/// Parses `KEY=VALUE` into a string context entry.
pub fn parse_assignment(text: &str) -> Result<(String, Value), ContextError> {
    match text.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), Value::String(value.to_string())))
        }
        _ => Err(ContextError::InvalidAssignment(text.to_string())),
    }
}
