// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Minimal ANSI color helpers, honoring NO_COLOR and non-tty output.

use kd_core::MemberStatus;
use std::io::IsTerminal;

fn enabled() -> bool {
    std::env::var_os("NO_COLOR").is_none() && std::io::stdout().is_terminal()
}

fn wrap(code: &str, text: &str) -> String {
    if enabled() {
        format!("\x1b[{}m{}\x1b[0m", code, text)
    } else {
        text.to_string()
    }
}

pub fn bold(text: &str) -> String {
    wrap("1", text)
}

pub fn dim(text: &str) -> String {
    wrap("2", text)
}

/// Color a member status for the status table.
pub fn status(value: MemberStatus) -> String {
    let code = match value {
        MemberStatus::Responded => "32",
        MemberStatus::Running => "36",
        MemberStatus::Pending => "2",
        MemberStatus::Stalled => "33",
        MemberStatus::Errored | MemberStatus::TimedOut | MemberStatus::Interrupted => "31",
    };
    wrap(code, value.as_str())
}
