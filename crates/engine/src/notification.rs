// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Turn reconciled job events into user-facing notifications.

use crate::reconcile::JobEvent;
use crate::state::JobState;
use hw_core::{
    format_elapsed_ms, IdempotencyKey, JobKind, JobPayload, Notification, NotificationKind,
};

fn kind_label(kind: JobKind) -> &'static str {
    match kind {
        JobKind::AiTask => "AI task",
        JobKind::TestCaseRun => "Test run",
        JobKind::ExplorationSession => "Exploration",
    }
}

fn job_notification(
    state: &JobState,
    kind: NotificationKind,
    title: String,
    message: String,
) -> Notification {
    Notification {
        key: IdempotencyKey::for_job(kind, &state.job.id),
        kind,
        job_id: state.job.id.clone(),
        title,
        message,
        report_url: state.job.terminal_result.as_ref().and_then(|r| r.report_url.clone()),
    }
}

/// Build the notification for a reconciled event.
pub fn for_event(event: &JobEvent, state: &JobState) -> Notification {
    let job = &state.job;
    let label = kind_label(job.kind);
    let duration = job
        .terminal_result
        .as_ref()
        .map(|r| format_elapsed_ms(r.duration_ms))
        .unwrap_or_else(|| format_elapsed_ms(job.elapsed_ms(job.started_at_ms)));
    match event {
        JobEvent::PlanGenerated(plan_id) => {
            let message = match &state.payload {
                Some(JobPayload::Plan(plan)) if plan.plan_id == *plan_id => {
                    format!("{label} {} planned {} step(s)", job.id.short(8), plan.steps.len())
                }
                _ => format!("{label} {} generated a plan", job.id.short(8)),
            };
            Notification {
                key: IdempotencyKey::plan_generated(plan_id),
                kind: NotificationKind::PlanGenerated,
                job_id: job.id.clone(),
                title: "Plan generated".to_string(),
                message,
                report_url: None,
            }
        }
        JobEvent::ApprovalRequired => job_notification(
            state,
            NotificationKind::ApprovalRequired,
            "Approval required".to_string(),
            format!("{label} {} is waiting for approval", job.id.short(8)),
        ),
        JobEvent::Completed => job_notification(
            state,
            NotificationKind::TaskCompleted,
            format!("{label} completed"),
            format!("{} finished in {duration}", job.id.short(8)),
        ),
        JobEvent::Failed => {
            let reason = job
                .terminal_result
                .as_ref()
                .and_then(|r| r.error.as_deref())
                .map(|e| format!(": {e}"))
                .unwrap_or_default();
            job_notification(
                state,
                NotificationKind::TaskFailed,
                format!("{label} failed"),
                format!("{} failed after {duration}{reason}", job.id.short(8)),
            )
        }
    }
}

/// Timed out or abandoned: the client lost track of the job.
pub fn execution_unavailable(state: &JobState, reason: &str) -> Notification {
    let job = &state.job;
    job_notification(
        state,
        NotificationKind::ExecutionUnavailable,
        "Execution unavailable".to_string(),
        format!("{} {}: {reason}", kind_label(job.kind), job.id.short(8)),
    )
}

#[cfg(test)]
#[path = "notification_tests.rs"]
mod tests;
