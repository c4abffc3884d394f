// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Message model, filename codec, and the failure-prefix classifier.
//!
//! A message is one numbered file in a thread directory. The filename
//! carries the sequence number and sender for cheap listing; the fenced
//! header carries the full metadata. Failure outcomes are encoded as a
//! body prefix; this module owns the one and only prefix test, consumed
//! by the status deriver, the retry engine, and the orchestrator alike.

use crate::frontmatter::{Frontmatter, FrontmatterError};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Sender name used for the human operator's messages.
pub const HUMAN_SENDER: &str = "king";

/// Body prefix marking a failed agent run.
pub const ERROR_PREFIX: &str = "*Error:";
/// Body prefix marking a timed-out agent run.
pub const TIMEOUT_PREFIX: &str = "*Timeout:";
/// Body prefix marking a cancelled agent run.
pub const INTERRUPTED_PREFIX: &str = "*Interrupted:";

/// How a message body classifies, when it is not a normal reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    Errored,
    TimedOut,
    Interrupted,
}

/// Classify a message body by its failure prefix.
///
/// This is the single failure signal in the system: a body that does not
/// start with one of the prefixes is a normal reply, full stop.
pub fn failure_kind(body: &str) -> Option<FailureKind> {
    if body.starts_with(ERROR_PREFIX) {
        Some(FailureKind::Errored)
    } else if body.starts_with(TIMEOUT_PREFIX) {
        Some(FailureKind::TimedOut)
    } else if body.starts_with(INTERRUPTED_PREFIX) {
        Some(FailureKind::Interrupted)
    } else {
        None
    }
}

/// True when the body carries any failure prefix.
pub fn is_failure(body: &str) -> bool {
    failure_kind(body).is_some()
}

/// The `to` header: a single member, several, or everyone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Recipients {
    All,
    Named(Vec<String>),
}

impl Recipients {
    /// Parse a `to` header value: the sentinel "all" or comma-separated names.
    pub fn parse(value: &str) -> Self {
        let trimmed = value.trim();
        if trimmed.is_empty() || trimmed == "all" {
            return Recipients::All;
        }
        Recipients::Named(
            trimmed
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
        )
    }

    /// Expand against the thread's declared members.
    pub fn expand<'a>(&'a self, declared: &'a [String]) -> Vec<String> {
        match self {
            Recipients::All => declared.to_vec(),
            Recipients::Named(names) => names.clone(),
        }
    }
}

impl fmt::Display for Recipients {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Recipients::All => write!(f, "all"),
            Recipients::Named(names) => write!(f, "{}", names.join(", ")),
        }
    }
}

/// One message in a thread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub seq: u32,
    pub from: String,
    pub to: Recipients,
    pub timestamp: DateTime<Utc>,
    pub refs: Vec<String>,
    /// Header keys the core does not recognize, preserved verbatim.
    pub extra: Vec<(String, String)>,
    pub body: String,
}

/// Errors reading a message file's content.
#[derive(Debug, Error)]
pub enum MessageError {
    #[error(transparent)]
    Frontmatter(#[from] FrontmatterError),
    #[error("missing required header {0:?}")]
    MissingHeader(&'static str),
    #[error("invalid timestamp {0:?}")]
    InvalidTimestamp(String),
}

impl Message {
    /// Classify this message's body by failure prefix.
    pub fn failure(&self) -> Option<FailureKind> {
        failure_kind(&self.body)
    }

    /// Render to the on-disk fenced form.
    pub fn render(&self) -> String {
        let mut fm = Frontmatter::new();
        fm.push("from", self.from.clone());
        fm.push("to", self.to.to_string());
        fm.push(
            "timestamp",
            self.timestamp.to_rfc3339_opts(SecondsFormat::Secs, true),
        );
        if !self.refs.is_empty() {
            fm.push("refs", self.refs.join(", "));
        }
        for (key, value) in &self.extra {
            fm.push(key.clone(), value.clone());
        }
        fm.body = self.body.clone();
        fm.render()
    }

    /// Parse from file content; `seq` comes from the filename.
    pub fn parse(seq: u32, content: &str) -> Result<Self, MessageError> {
        let fm = Frontmatter::parse(content)?;
        let mut from = None;
        let mut to = Recipients::All;
        let mut timestamp = None;
        let mut refs = Vec::new();
        let mut extra = Vec::new();
        for (key, value) in fm.headers {
            match key.as_str() {
                "from" => from = Some(value),
                "to" => to = Recipients::parse(&value),
                "timestamp" => {
                    let parsed = DateTime::parse_from_rfc3339(&value)
                        .map_err(|_| MessageError::InvalidTimestamp(value.clone()))?;
                    timestamp = Some(parsed.with_timezone(&Utc));
                }
                "refs" => {
                    refs = value
                        .split(',')
                        .map(|s| s.trim().to_string())
                        .filter(|s| !s.is_empty())
                        .collect();
                }
                _ => extra.push((key, value)),
            }
        }
        Ok(Self {
            seq,
            from: from.ok_or(MessageError::MissingHeader("from"))?,
            to,
            timestamp: timestamp.ok_or(MessageError::MissingHeader("timestamp"))?,
            refs,
            extra,
            body: fm.body,
        })
    }
}

/// Compose the filename for a message: `NNNN-<sender>.md`, zero-padded.
pub fn message_file_name(seq: u32, sender: &str) -> String {
    format!("{:04}-{}.md", seq, sanitize_sender(sender))
}

/// Decompose a message filename into `(seq, sender)`.
///
/// Non-message entries (metadata, stream files) return `None`.
pub fn parse_file_name(name: &str) -> Option<(u32, String)> {
    let stem = name.strip_suffix(".md")?;
    let (digits, sender) = stem.split_once('-')?;
    if digits.len() < 4 || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let seq: u32 = digits.parse().ok()?;
    if seq == 0 || sender.is_empty() {
        return None;
    }
    Some((seq, sender.to_string()))
}

/// Make a sender name safe to embed in a filename.
pub fn sanitize_sender(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '.' {
                c
            } else {
                '-'
            }
        })
        .collect()
}

#[cfg(test)]
#[path = "message_tests.rs"]
mod tests;
