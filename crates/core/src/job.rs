// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job kind, status machine, and terminal result.

use crate::id::JobId;
use crate::payload::JobPayload;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// The kind of remote operation a job runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobKind {
    AiTask,
    TestCaseRun,
    ExplorationSession,
}

crate::simple_display! {
    JobKind {
        AiTask => "ai_task",
        TestCaseRun => "test_case_run",
        ExplorationSession => "exploration_session",
    }
}

impl JobKind {
    pub const ALL: [JobKind; 3] =
        [JobKind::AiTask, JobKind::TestCaseRun, JobKind::ExplorationSession];

    /// Phase a freshly started job of this kind is in.
    pub fn initial_phase(self) -> JobPhase {
        match self {
            JobKind::AiTask => JobPhase::Planning,
            JobKind::TestCaseRun => JobPhase::Executing,
            JobKind::ExplorationSession => JobPhase::Analysis,
        }
    }
}

/// Error for unrecognized kind strings.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown job kind: {0}")]
pub struct UnknownJobKind(pub String);

impl FromStr for JobKind {
    type Err = UnknownJobKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().replace('-', "_").as_str() {
            "ai_task" | "ai" => Ok(JobKind::AiTask),
            "test_case_run" | "testcase" | "test_case" => Ok(JobKind::TestCaseRun),
            "exploration_session" | "exploration" => Ok(JobKind::ExplorationSession),
            _ => Err(UnknownJobKind(s.to_string())),
        }
    }
}

/// Kind-specific sub-stage of a job.
///
/// Phases only move forward: [`JobPhase::rank`] orders them within a kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobPhase {
    Planning,
    Executing,
    Analysis,
    Exploration,
    Validation,
}

crate::simple_display! {
    JobPhase {
        Planning => "planning",
        Executing => "executing",
        Analysis => "analysis",
        Exploration => "exploration",
        Validation => "validation",
    }
}

impl JobPhase {
    /// Parse a host phase string. Unknown strings yield `None`.
    pub fn from_host(s: &str) -> Option<Self> {
        let phase = match s.trim().to_ascii_lowercase().as_str() {
            "planning" | "plan" => JobPhase::Planning,
            "executing" | "execution" => JobPhase::Executing,
            "analysis" | "analyzing" => JobPhase::Analysis,
            "exploration" | "exploring" => JobPhase::Exploration,
            "validation" | "validating" => JobPhase::Validation,
            _ => return None,
        };
        Some(phase)
    }

    pub fn rank(self) -> u8 {
        match self {
            JobPhase::Planning | JobPhase::Analysis => 0,
            JobPhase::Executing | JobPhase::Exploration => 1,
            JobPhase::Validation => 2,
        }
    }

    pub fn belongs_to(self, kind: JobKind) -> bool {
        matches!(
            (kind, self),
            (JobKind::AiTask, JobPhase::Planning | JobPhase::Executing)
                | (JobKind::TestCaseRun, JobPhase::Executing)
                | (
                    JobKind::ExplorationSession,
                    JobPhase::Analysis | JobPhase::Exploration | JobPhase::Validation
                )
        )
    }
}

/// Reconciled status of a job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Starting,
    Running,
    AwaitingApproval,
    Completed,
    Failed,
    NotFound,
    TimedOut,
}

crate::simple_display! {
    JobStatus {
        Starting => "starting",
        Running => "running",
        AwaitingApproval => "awaiting_approval",
        Completed => "completed",
        Failed => "failed",
        NotFound => "not_found",
        TimedOut => "timed_out",
    }
}

impl JobStatus {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            JobStatus::Completed | JobStatus::Failed | JobStatus::NotFound | JobStatus::TimedOut
        )
    }

    /// Map a host status string. Unknown strings yield `None`.
    pub fn from_host(s: &str) -> Option<Self> {
        let status = match s.trim().to_ascii_lowercase().as_str() {
            "starting" | "pending" | "queued" => JobStatus::Starting,
            "running" | "executing" | "in_progress" => JobStatus::Running,
            "awaiting_approval" | "waiting_approval" | "pending_approval" => {
                JobStatus::AwaitingApproval
            }
            "completed" | "complete" | "success" | "done" => JobStatus::Completed,
            "failed" | "failure" | "error" => JobStatus::Failed,
            "not_found" => JobStatus::NotFound,
            "timed_out" | "timeout" => JobStatus::TimedOut,
            _ => return None,
        };
        Some(status)
    }
}

/// Final outcome of a job; present only once its status is terminal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TerminalResult {
    pub success: bool,
    pub duration_ms: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<JobPayload>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub report_url: Option<String>,
}

impl TerminalResult {
    pub fn new(success: bool, duration_ms: u64) -> Self {
        Self { success, duration_ms, payload: None, error: None, report_url: None }
    }

    crate::setters! {
        option {
            payload: JobPayload,
            error: String,
            report_url: String,
        }
    }
}

/// One tracked remote long-running operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub id: JobId,
    pub kind: JobKind,
    pub phase: JobPhase,
    pub status: JobStatus,
    pub started_at_ms: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_polled_at_ms: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub terminal_result: Option<TerminalResult>,
}

impl Job {
    pub fn new(id: JobId, kind: JobKind, started_at_ms: u64) -> Self {
        Self {
            id,
            kind,
            phase: kind.initial_phase(),
            status: JobStatus::Starting,
            started_at_ms,
            last_polled_at_ms: None,
            terminal_result: None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// Milliseconds between start and the latest poll (or `now_ms`).
    pub fn elapsed_ms(&self, now_ms: u64) -> u64 {
        self.last_polled_at_ms.unwrap_or(now_ms).saturating_sub(self.started_at_ms)
    }

    /// Advance the phase if `phase` belongs to this kind and ranks later.
    pub fn advance_phase(&mut self, phase: JobPhase) -> bool {
        if phase.belongs_to(self.kind) && phase.rank() > self.phase.rank() {
            self.phase = phase;
            return true;
        }
        false
    }
}

#[cfg(test)]
#[path = "job_tests.rs"]
mod tests;
