// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fenced-header codec for message files.
//!
//! A message file is a `---` fence, `key: value` header lines, a closing
//! `---` fence, one blank separator line, then the body verbatim. Unknown
//! header keys pass through untouched; consumers pick the keys they know.

use std::fmt;
use thiserror::Error;

/// Header fence sentinel.
pub const FENCE: &str = "---";

/// A parsed header block plus body.
///
/// Header order is preserved so that re-rendering a parsed file reproduces
/// it byte-for-byte.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Frontmatter {
    pub headers: Vec<(String, String)>,
    pub body: String,
}

/// Structured parse failure, naming the offending line.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FrontmatterError {
    #[error("missing opening fence on line 1")]
    MissingOpeningFence,
    #[error("invalid header on line {line}: {text:?}")]
    InvalidHeader { line: usize, text: String },
    #[error("unterminated header fence")]
    UnterminatedFence,
}

/// Split off the first line (without its newline) from `input`.
fn split_line(input: &str) -> (&str, &str) {
    match input.find('\n') {
        Some(pos) => (&input[..pos], &input[pos + 1..]),
        None => (input, ""),
    }
}

impl Frontmatter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a header field.
    pub fn push(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.headers.push((key.into(), value.into()));
    }

    /// First value for `key`, if present.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Parse a fenced-header file.
    ///
    /// The body is everything after the closing fence and one blank
    /// separator line, byte-exact.
    pub fn parse(input: &str) -> Result<Self, FrontmatterError> {
        let (first, mut rest) = split_line(input);
        if first.trim_end_matches('\r') != FENCE {
            return Err(FrontmatterError::MissingOpeningFence);
        }

        let mut headers = Vec::new();
        let mut line_no = 1usize;
        loop {
            if rest.is_empty() {
                return Err(FrontmatterError::UnterminatedFence);
            }
            let (line, tail) = split_line(rest);
            line_no += 1;
            let stripped = line.trim_end_matches('\r');
            if stripped == FENCE {
                rest = tail;
                break;
            }
            let Some((key, value)) = stripped.split_once(':') else {
                return Err(FrontmatterError::InvalidHeader {
                    line: line_no,
                    text: stripped.to_string(),
                });
            };
            headers.push((key.trim().to_string(), value.trim().to_string()));
            rest = tail;
        }

        // One blank separator line between fence and body.
        if let Some(tail) = rest.strip_prefix("\r\n") {
            rest = tail;
        } else if let Some(tail) = rest.strip_prefix('\n') {
            rest = tail;
        }

        Ok(Self { headers, body: rest.to_string() })
    }

    /// Render back to the on-disk form.
    pub fn render(&self) -> String {
        let mut out = String::with_capacity(self.body.len() + 64);
        out.push_str(FENCE);
        out.push('\n');
        for (key, value) in &self.headers {
            out.push_str(key);
            out.push_str(": ");
            out.push_str(value);
            out.push('\n');
        }
        out.push_str(FENCE);
        out.push('\n');
        out.push('\n');
        out.push_str(&self.body);
        out
    }
}

impl fmt::Display for Frontmatter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.render())
    }
}

#[cfg(test)]
#[path = "frontmatter_tests.rs"]
mod tests;
