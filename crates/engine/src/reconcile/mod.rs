// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Execution state reconciler.
//!
//! Merges one status snapshot into the stored [`JobState`], producing the
//! next state plus what changed. Pure: no I/O, no clock reads. Only log
//! entries beyond the stored log length are applied, so delivering the same
//! snapshot twice is a no-op.

pub mod completeness;

use crate::error::ReconciliationError;
use crate::state::JobState;
use hw_core::{
    ActionType, BlockId, BlockStatus, EdgeExecutionState, EdgeStatus, EntryPayload,
    ExecutionLogEntry, JobKind, JobPayload, JobPhase, JobStatus, PlanId, StepResults,
    TerminalResult,
};
use hw_wire::{RawLogEntry, StatusSnapshot};

/// Reconciled transitions that may surface as notifications.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobEvent {
    PlanGenerated(PlanId),
    ApprovalRequired,
    Completed,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockTransition {
    pub block_id: BlockId,
    pub from: BlockStatus,
    pub to: BlockStatus,
}

/// Output of one reconciliation pass.
#[derive(Debug, Clone)]
pub struct Reconciliation {
    pub state: JobState,
    pub new_entries: Vec<ExecutionLogEntry>,
    pub transitions: Vec<BlockTransition>,
    pub events: Vec<JobEvent>,
    /// Anything other than the poll timestamp differs from the input state.
    pub changed: bool,
}

/// Evidence that the job finished, from whichever source supplied it.
struct Finish {
    success: bool,
    duration_ms: Option<u64>,
    error: Option<String>,
    report_url: Option<String>,
}

pub fn reconcile(
    prev: &JobState,
    snapshot: &StatusSnapshot,
    now_ms: u64,
) -> Result<Reconciliation, ReconciliationError> {
    if prev.job.is_terminal() {
        return Ok(Reconciliation {
            state: prev.clone(),
            new_entries: Vec::new(),
            transitions: Vec::new(),
            events: Vec::new(),
            changed: false,
        });
    }

    let stored = prev.log.len();
    let received = snapshot.execution_log.len();
    if received < stored {
        return Err(ReconciliationError::LogRegressed { stored, received });
    }
    let new_entries = decode_entries(&snapshot.execution_log[stored..], stored)?;

    let mut pass = Pass {
        state: prev.clone(),
        transitions: Vec::new(),
        events: Vec::new(),
        now_ms,
    };
    pass.state.job.last_polled_at_ms = Some(now_ms);
    pass.apply_phase(snapshot.phase.as_deref());
    pass.apply_status(snapshot.status.as_deref());
    if snapshot.is_executing == Some(true) {
        pass.mark_running();
    }

    let mut finish = None;
    for entry in &new_entries {
        if finish.is_none() {
            finish = pass.apply_entry(entry);
        }
        pass.state.log.push(entry.clone());
    }
    if finish.is_none() {
        if let Some(block) = &snapshot.current_block_id {
            pass.start_block(block, now_ms);
        }
    }

    pass.apply_payload(snapshot);
    for mapping in &snapshot.learned_mappings {
        pass.state.mappings.merge(mapping);
    }
    if let Some(url) = &snapshot.report_url {
        pass.state.report_url = Some(url.clone());
    }

    let finish = finish.or_else(|| host_finish(snapshot)).or_else(|| pass.fallback_finish(snapshot));
    if let Some(finish) = finish {
        pass.finalize(finish, snapshot);
    }

    pass.derive_edges();
    pass.derive_progress(snapshot);
    pass.derive_label(snapshot);

    let changed = materially_differs(prev, &pass.state);
    Ok(Reconciliation {
        state: pass.state,
        new_entries,
        transitions: pass.transitions,
        events: pass.events,
        changed,
    })
}

fn decode_entries(
    raw: &[RawLogEntry],
    offset: usize,
) -> Result<Vec<ExecutionLogEntry>, ReconciliationError> {
    raw.iter()
        .enumerate()
        .map(|(i, entry)| {
            let position = offset + i;
            if entry.action_type.trim().is_empty() {
                return Err(ReconciliationError::Malformed {
                    position,
                    reason: "missing action_type".to_string(),
                });
            }
            let payload = if entry.data.is_null() {
                EntryPayload::default()
            } else {
                serde_json::from_value(entry.data.clone()).map_err(|e| {
                    ReconciliationError::Malformed { position, reason: e.to_string() }
                })?
            };
            Ok(ExecutionLogEntry {
                position,
                action_type: ActionType::from(entry.action_type.trim()),
                payload,
                timestamp_ms: entry.timestamp_ms,
            })
        })
        .collect()
}

/// Explicit terminal status from the host, without a log entry.
fn host_finish(snapshot: &StatusSnapshot) -> Option<Finish> {
    let status = snapshot.status.as_deref().and_then(JobStatus::from_host)?;
    if !status.is_terminal() {
        return None;
    }
    Some(Finish {
        success: status == JobStatus::Completed,
        duration_ms: None,
        error: snapshot.error.clone(),
        report_url: None,
    })
}

fn materially_differs(prev: &JobState, next: &JobState) -> bool {
    if prev.job.last_polled_at_ms == next.job.last_polled_at_ms {
        return prev != next;
    }
    let mut probe = next.clone();
    probe.job.last_polled_at_ms = prev.job.last_polled_at_ms;
    *prev != probe
}

struct Pass {
    state: JobState,
    transitions: Vec<BlockTransition>,
    events: Vec<JobEvent>,
    now_ms: u64,
}

impl Pass {
    fn apply_phase(&mut self, phase: Option<&str>) {
        if let Some(phase) = phase.and_then(JobPhase::from_host) {
            self.state.job.advance_phase(phase);
        }
    }

    fn apply_status(&mut self, status: Option<&str>) {
        let Some(status) = status.and_then(JobStatus::from_host) else {
            return;
        };
        match (self.state.job.status, status) {
            (current, JobStatus::AwaitingApproval) if current != JobStatus::AwaitingApproval => {
                self.state.job.status = JobStatus::AwaitingApproval;
                self.events.push(JobEvent::ApprovalRequired);
            }
            (JobStatus::Starting | JobStatus::AwaitingApproval, JobStatus::Running) => {
                self.state.job.status = JobStatus::Running;
            }
            _ => {}
        }
    }

    /// Apply one log entry. Returns terminal evidence for task-level entries.
    fn apply_entry(&mut self, entry: &ExecutionLogEntry) -> Option<Finish> {
        let at = entry.timestamp_ms.unwrap_or(self.now_ms);
        match &entry.action_type {
            ActionType::StepStarted | ActionType::StepSuccess | ActionType::StepFailed => {
                self.mark_running();
                if self.state.job.kind == JobKind::AiTask {
                    self.state.job.advance_phase(JobPhase::Executing);
                }
            }
            _ => {}
        }

        match &entry.action_type {
            ActionType::StepStarted => {
                if let Some(block) = self.block_for(&entry.payload) {
                    self.start_block(&block, at);
                }
            }
            ActionType::StepSuccess => {
                if let Some(block) = self.block_for(&entry.payload) {
                    self.finish_block(&block, BlockStatus::Success, &entry.payload, at);
                }
            }
            ActionType::StepFailed => {
                let status = if entry.payload.error_kind.as_deref() == Some("error") {
                    BlockStatus::Error
                } else {
                    BlockStatus::Failure
                };
                if let Some(block) = self.block_for(&entry.payload) {
                    self.finish_block(&block, status, &entry.payload, at);
                }
            }
            ActionType::TaskCompleted | ActionType::TaskFailed => {
                return Some(Finish {
                    success: entry.action_type.terminal_success().unwrap_or(false),
                    duration_ms: entry.payload.duration_ms,
                    error: entry.payload.error.clone(),
                    report_url: entry.payload.report_url.clone(),
                });
            }
            ActionType::PlanGenerated => {
                if let Some(plan_id) = &entry.payload.plan_id {
                    self.events.push(JobEvent::PlanGenerated(plan_id.clone()));
                }
            }
            ActionType::Other(_) => {}
        }
        None
    }

    fn mark_running(&mut self) {
        if self.state.job.status == JobStatus::Starting {
            self.state.job.status = JobStatus::Running;
        }
    }

    /// Block named by the entry, else the graph block at its step index.
    fn block_for(&self, payload: &EntryPayload) -> Option<BlockId> {
        if let Some(id) = &payload.block_id {
            return Some(id.clone());
        }
        let step = payload.step? as usize;
        self.state.graph.blocks.get(step).cloned()
    }

    /// Mark `id` executing, first closing any other executing block.
    fn start_block(&mut self, id: &BlockId, at: u64) {
        let current = self.state.blocks.get(id).map(|b| b.status).unwrap_or_default();
        if current.is_terminal() || current == BlockStatus::Executing {
            return;
        }
        let others: Vec<BlockId> = self
            .state
            .blocks
            .iter()
            .filter(|(other, b)| *other != id && b.status == BlockStatus::Executing)
            .map(|(other, _)| other.clone())
            .collect();
        for other in others {
            self.close_block(&other, BlockStatus::Success, at);
        }
        self.state.blocks.entry(id.clone()).or_default().start(at);
        self.transitions.push(BlockTransition {
            block_id: id.clone(),
            from: current,
            to: BlockStatus::Executing,
        });
    }

    fn finish_block(&mut self, id: &BlockId, status: BlockStatus, payload: &EntryPayload, at: u64) {
        let block = self.state.blocks.entry(id.clone()).or_default();
        let from = block.status;
        if !block.finish(status, at) {
            return;
        }
        if payload.duration_ms.is_some() {
            block.explicit_duration_ms = payload.duration_ms;
        }
        if payload.error.is_some() {
            block.error = payload.error.clone();
        }
        if payload.result.is_some() {
            block.result = payload.result.clone();
        }
        self.transitions.push(BlockTransition { block_id: id.clone(), from, to: status });
    }

    fn close_block(&mut self, id: &BlockId, status: BlockStatus, at: u64) {
        if let Some(block) = self.state.blocks.get_mut(id) {
            let from = block.status;
            if block.finish(status, at) {
                self.transitions.push(BlockTransition { block_id: id.clone(), from, to: status });
            }
        }
    }

    fn apply_payload(&mut self, snapshot: &StatusSnapshot) {
        let kind = self.state.job.kind;
        let incoming = match kind {
            JobKind::AiTask => snapshot.plan.clone().map(JobPayload::Plan),
            JobKind::TestCaseRun => snapshot
                .step_results
                .clone()
                .map(|results| JobPayload::StepResults(StepResults { results })),
            JobKind::ExplorationSession => snapshot.exploration.clone().map(JobPayload::Exploration),
        };
        let Some(incoming) = incoming else {
            return;
        };
        if !completeness::accepts(kind, self.state.payload.as_ref(), &incoming) {
            return;
        }
        match &incoming {
            JobPayload::Plan(plan) => {
                self.events.push(JobEvent::PlanGenerated(plan.plan_id.clone()));
            }
            JobPayload::Exploration(proposal) => {
                if let Some(phase) = proposal.phase {
                    self.state.job.advance_phase(phase);
                }
            }
            JobPayload::StepResults(_) => {}
        }
        self.state.payload = Some(incoming);
    }

    /// `is_executing == false` without a terminal entry means the host is
    /// done but did not say so in the log.
    fn fallback_finish(&self, snapshot: &StatusSnapshot) -> Option<Finish> {
        if snapshot.is_executing != Some(false) {
            return None;
        }
        // Only a status the host reported holds the job back; `Starting` is
        // also the local default before any evidence arrives.
        let reported = snapshot.status.as_deref().and_then(JobStatus::from_host);
        let held = match reported {
            Some(status) => matches!(status, JobStatus::Starting | JobStatus::AwaitingApproval),
            None => self.state.job.status == JobStatus::AwaitingApproval,
        };
        if held {
            return None;
        }
        let blocks_ok = self.state.blocks.values().all(|b| !b.status.is_failed());
        let results_ok = match &self.state.payload {
            Some(JobPayload::StepResults(r)) => r.results.iter().all(|r| r.success),
            _ => true,
        };
        Some(Finish {
            success: snapshot.success && snapshot.error.is_none() && blocks_ok && results_ok,
            duration_ms: None,
            error: snapshot.error.clone(),
            report_url: None,
        })
    }

    fn finalize(&mut self, finish: Finish, snapshot: &StatusSnapshot) {
        let now = self.now_ms;
        let job = &mut self.state.job;
        job.status = if finish.success { JobStatus::Completed } else { JobStatus::Failed };
        let duration_ms = finish.duration_ms.unwrap_or_else(|| job.elapsed_ms(now));

        let report_url = finish.report_url.or_else(|| self.state.report_url.clone());
        self.state.report_url = report_url.clone();

        let mut result = TerminalResult::new(finish.success, duration_ms);
        result.payload = self.state.payload.clone();
        result.error = finish.error.or_else(|| snapshot.error.clone());
        result.report_url = report_url;
        self.state.job.terminal_result = Some(result);

        let close_as = if finish.success { BlockStatus::Success } else { BlockStatus::Failure };
        let executing: Vec<BlockId> = self
            .state
            .blocks
            .iter()
            .filter(|(_, b)| b.status == BlockStatus::Executing)
            .map(|(id, _)| id.clone())
            .collect();
        for id in executing {
            self.close_block(&id, close_as, now);
        }

        self.events.push(if finish.success { JobEvent::Completed } else { JobEvent::Failed });
    }

    fn derive_edges(&mut self) {
        for edge in &self.state.graph.edges {
            let status_of =
                |id: &BlockId| self.state.blocks.get(id).map(|b| b.status).unwrap_or_default();
            let (source, target) = (status_of(&edge.source), status_of(&edge.target));
            let status = if target == BlockStatus::Executing {
                EdgeStatus::Active
            } else if target.is_failed() {
                EdgeStatus::Failure
            } else if source == BlockStatus::Success && target == BlockStatus::Success {
                EdgeStatus::Success
            } else {
                EdgeStatus::Idle
            };
            self.state.edges.insert(edge.id.clone(), EdgeExecutionState { status });
        }
    }

    fn derive_progress(&mut self, snapshot: &StatusSnapshot) {
        if self.state.job.status == JobStatus::Completed {
            self.state.progress_percentage = 100.0;
            return;
        }
        let from_blocks = || {
            let total = self.state.blocks.len();
            (total > 0).then(|| {
                let done = self.state.blocks.values().filter(|b| b.status.is_terminal()).count();
                done as f64 / total as f64 * 100.0
            })
        };
        let candidate = snapshot.progress.as_ref().and_then(|p| p.percent()).or_else(from_blocks);
        if let Some(pct) = candidate.filter(|p| p.is_finite()) {
            let pct = pct.clamp(0.0, 100.0);
            if pct > self.state.progress_percentage {
                self.state.progress_percentage = pct;
            }
        }
    }

    fn derive_label(&mut self, snapshot: &StatusSnapshot) {
        let label = snapshot
            .current_step_label
            .clone()
            .filter(|l| !l.trim().is_empty())
            .or_else(|| self.state.executing_block().map(|id| id.to_string()))
            .or_else(|| self.state.log.iter().rev().find_map(|e| e.step_label()));
        if label.is_some() {
            self.state.current_step_label = label;
        }
    }
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
