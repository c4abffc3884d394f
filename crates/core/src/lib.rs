// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Core data model for the kingdom council runtime.
//!
//! Everything here is pure data and codecs: thread/message types, the
//! frontmatter file format, normalized stream frames, phases, and the
//! failure-prefix classifier. No I/O beyond what a codec needs.

pub mod elapsed;
pub mod frame;
pub mod frontmatter;
pub mod id;
pub mod member;
pub mod message;
pub mod phase;

pub use elapsed::format_elapsed;
pub use frame::StreamFrame;
pub use frontmatter::{Frontmatter, FrontmatterError};
pub use id::ThreadId;
pub use member::MemberStatus;
pub use message::{
    failure_kind, is_failure, message_file_name, parse_file_name, sanitize_sender, FailureKind,
    Message, MessageError, Recipients, ERROR_PREFIX, HUMAN_SENDER, INTERRUPTED_PREFIX,
    TIMEOUT_PREFIX,
};
pub use phase::{Phase, PhaseParseError};
