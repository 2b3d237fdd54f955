// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! User-facing notifications and their idempotency keys.

use crate::id::{JobId, PlanId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    PlanGenerated,
    TaskCompleted,
    TaskFailed,
    ApprovalRequired,
    /// Timed out or abandoned: the client lost track of the job.
    ExecutionUnavailable,
}

crate::simple_display! {
    NotificationKind {
        PlanGenerated => "plan-generated",
        TaskCompleted => "task-completed",
        TaskFailed => "task-failed",
        ApprovalRequired => "approval-required",
        ExecutionUnavailable => "execution-unavailable",
    }
}

impl NotificationKind {
    /// True for the classes of which a job emits exactly one.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            NotificationKind::TaskCompleted
                | NotificationKind::TaskFailed
                | NotificationKind::ExecutionUnavailable
        )
    }
}

/// Stable string identifying one logical event, e.g. `task-completed-J1`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IdempotencyKey(String);

impl IdempotencyKey {
    pub fn plan_generated(plan_id: &PlanId) -> Self {
        Self(format!("{}-{plan_id}", NotificationKind::PlanGenerated))
    }

    pub fn for_job(kind: NotificationKind, job_id: &JobId) -> Self {
        Self(format!("{kind}-{job_id}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for IdempotencyKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub key: IdempotencyKey,
    pub kind: NotificationKind,
    pub job_id: JobId,
    pub title: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub report_url: Option<String>,
}

#[cfg(test)]
#[path = "notification_tests.rs"]
mod tests;
