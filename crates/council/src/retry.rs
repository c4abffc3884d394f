// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Targeted retry of failed members.
//!
//! A retry re-reads the latest turn from disk, finds the expected members
//! without a normal reply, and re-runs only those with the original human
//! prompt. Session tokens are left alone: the assumption is the prior call
//! failed partway and resuming continues productively. Resetting a session
//! is a separate, explicit operation.

use crate::error::CouncilError;
use crate::orchestrator::{Council, ResponseCallback};
use crate::runner::MemberResponse;
use kd_core::ThreadId;
use kd_store::{derive_status, latest_turn, LivenessHint};
use tokio_util::sync::CancellationToken;

impl Council {
    /// Re-ask only the members of the latest turn that failed or never
    /// answered. A turn where everyone responded is a no-op that writes
    /// nothing.
    pub async fn retry(
        &self,
        thread: &ThreadId,
        streaming: bool,
        cancel: &CancellationToken,
        on_response: Option<ResponseCallback<'_>>,
    ) -> Result<Vec<MemberResponse>, CouncilError> {
        let declared = match self.store.read_meta(thread)? {
            Some(meta) => meta.members,
            None => self.config.council.members.clone(),
        };
        let messages = self.store.list_messages(thread)?;

        let (prompt, targets) = {
            let Some(turn) = latest_turn(&messages, &declared) else {
                return Err(CouncilError::EmptyThread);
            };
            let statuses = derive_status(&messages, &declared, |_| LivenessHint::Dead);
            let targets: Vec<String> = turn
                .expected
                .iter()
                .filter(|member| {
                    statuses
                        .get(member.as_str())
                        .map_or(true, |status| status.needs_retry())
                })
                .cloned()
                .collect();
            (turn.prompt.body.clone(), targets)
        };

        if targets.is_empty() {
            tracing::info!(thread = %thread, "nothing to retry");
            return Ok(Vec::new());
        }

        tracing::info!(thread = %thread, ?targets, "retrying failed members");
        // `run` truncates each target's stream file before launch, so
        // watcher offsets from the failed turn cannot dangle.
        self.run(thread, &targets, &prompt, streaming, cancel, on_response)
            .await
    }
}

#[cfg(test)]
#[path = "retry_tests.rs"]
mod tests;
