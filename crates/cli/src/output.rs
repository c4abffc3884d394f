// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Rendering helpers shared by commands.

use crate::color;
use kd_core::{Message, MemberStatus};
use kd_store::ThreadSummary;
use std::collections::BTreeMap;

/// Print one message with a compact header line.
pub fn print_message(message: &Message) {
    let header = format!(
        "── {:04} {} → {} ({}) ──",
        message.seq,
        message.from,
        message.to,
        message.timestamp.format("%Y-%m-%d %H:%M:%SZ"),
    );
    println!("{}", color::bold(&header));
    println!("{}", message.body.trim_end());
    println!();
}

/// Print the member → status table.
pub fn print_statuses(statuses: &BTreeMap<String, MemberStatus>) {
    let width = statuses.keys().map(String::len).max().unwrap_or(0);
    for (member, status) in statuses {
        println!("  {:width$}  {}", member, color::status(*status), width = width);
    }
}

/// Print one row of `kd list` output.
pub fn print_thread_summary(summary: &ThreadSummary) {
    let phase = summary
        .meta
        .as_ref()
        .map(|m| m.phase.to_string())
        .unwrap_or_else(|| "-".to_string());
    let members = summary
        .meta
        .as_ref()
        .map(|m| m.members.join(","))
        .unwrap_or_else(|| "-".to_string());
    let updated = summary
        .updated_at
        .map(|ts| {
            let secs = (chrono::Utc::now() - ts).num_seconds().max(0) as u64;
            format!("{} ago", kd_core::format_elapsed(secs))
        })
        .unwrap_or_else(|| "-".to_string());
    println!(
        "{}  {:8}  {:3} msg  {:10}  {}",
        summary.id,
        phase,
        summary.message_count,
        updated,
        color::dim(&members),
    );
}

/// True when any response in the set failed, for exit-code purposes.
pub fn any_failed(responses: &[kd_council::MemberResponse]) -> bool {
    responses.iter().any(|r| !r.succeeded())
}
