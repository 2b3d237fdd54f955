// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Append-only execution log entries surfaced by the host.

use crate::id::{BlockId, PlanId};
use serde::{Deserialize, Serialize};

/// Discriminator of a log entry.
///
/// Unknown discriminators are preserved as [`ActionType::Other`] so the log
/// cursor still advances past them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ActionType {
    StepStarted,
    StepSuccess,
    StepFailed,
    TaskCompleted,
    TaskFailed,
    PlanGenerated,
    Other(String),
}

impl From<&str> for ActionType {
    fn from(s: &str) -> Self {
        match s {
            "step_started" | "step_start" => ActionType::StepStarted,
            "step_success" => ActionType::StepSuccess,
            "step_failed" | "step_failure" => ActionType::StepFailed,
            "task_completed" => ActionType::TaskCompleted,
            "task_failed" => ActionType::TaskFailed,
            "plan_generated" => ActionType::PlanGenerated,
            other => ActionType::Other(other.to_string()),
        }
    }
}

impl From<String> for ActionType {
    fn from(s: String) -> Self {
        ActionType::from(s.as_str())
    }
}

impl From<ActionType> for String {
    fn from(a: ActionType) -> Self {
        a.as_str().to_string()
    }
}

impl ActionType {
    pub fn as_str(&self) -> &str {
        match self {
            ActionType::StepStarted => "step_started",
            ActionType::StepSuccess => "step_success",
            ActionType::StepFailed => "step_failed",
            ActionType::TaskCompleted => "task_completed",
            ActionType::TaskFailed => "task_failed",
            ActionType::PlanGenerated => "plan_generated",
            ActionType::Other(s) => s,
        }
    }

    /// `Some(success)` for entries that end the job.
    pub fn terminal_success(&self) -> Option<bool> {
        match self {
            ActionType::TaskCompleted => Some(true),
            ActionType::TaskFailed => Some(false),
            _ => None,
        }
    }
}

impl std::fmt::Display for ActionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Typed view of an entry's `data` object. All fields are optional; which
/// ones are set depends on the action type and job kind.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EntryPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_id: Option<BlockId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// `"error"` marks an infrastructure error rather than an assertion failure.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plan_id: Option<PlanId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub report_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<serde_json::Value>,
}

/// One ordered entry of the execution log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionLogEntry {
    /// Index in the log as last observed.
    pub position: usize,
    pub action_type: ActionType,
    #[serde(default)]
    pub payload: EntryPayload,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp_ms: Option<u64>,
}

impl ExecutionLogEntry {
    /// Human label for the step this entry refers to, if any.
    pub fn step_label(&self) -> Option<String> {
        if let Some(label) = &self.payload.label {
            return Some(label.clone());
        }
        if let Some(block) = &self.payload.block_id {
            return Some(block.to_string());
        }
        self.payload.step.map(|n| format!("step {n}"))
    }
}

#[cfg(test)]
#[path = "log_entry_tests.rs"]
mod tests;
