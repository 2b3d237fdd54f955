// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test helpers for use across crates.
//!
//! Gated behind `#[cfg(any(test, feature = "test-support"))]`.

use crate::id::BlockId;
use crate::log_entry::{ActionType, EntryPayload, ExecutionLogEntry};

// ── Proptest strategies ─────────────────────────────────────────────────

pub mod strategies {
    use crate::execution::BlockStatus;
    use crate::log_entry::ActionType;
    use proptest::prelude::*;

    pub fn arb_block_status() -> impl Strategy<Value = BlockStatus> {
        prop_oneof![
            Just(BlockStatus::Idle),
            Just(BlockStatus::Pending),
            Just(BlockStatus::Executing),
            Just(BlockStatus::Success),
            Just(BlockStatus::Failure),
            Just(BlockStatus::Error),
        ]
    }

    /// Action types weighted toward step entries, as real logs are.
    pub fn arb_action_type() -> impl Strategy<Value = ActionType> {
        prop_oneof![
            4 => Just(ActionType::StepStarted),
            4 => Just(ActionType::StepSuccess),
            2 => Just(ActionType::StepFailed),
            1 => Just(ActionType::TaskCompleted),
            1 => Just(ActionType::TaskFailed),
            1 => Just(ActionType::Other("heartbeat".to_string())),
        ]
    }
}

// ── Log entry factories ─────────────────────────────────────────────────

pub fn step_entry(position: usize, action: ActionType, block: &str) -> ExecutionLogEntry {
    ExecutionLogEntry {
        position,
        action_type: action,
        payload: EntryPayload { block_id: Some(BlockId::new(block)), ..EntryPayload::default() },
        timestamp_ms: None,
    }
}

pub fn task_entry(position: usize, success: bool) -> ExecutionLogEntry {
    ExecutionLogEntry {
        position,
        action_type: if success { ActionType::TaskCompleted } else { ActionType::TaskFailed },
        payload: EntryPayload::default(),
        timestamp_ms: None,
    }
}
