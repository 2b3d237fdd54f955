// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Materialized state of one tracked job, and its read-only snapshot.

use hw_core::{
    BlockExecutionState, BlockId, BlockStatus, EdgeExecutionState, EdgeId, ExecutionGraph,
    ExecutionLogEntry, Job, JobId, JobKind, JobPayload, JobPhase, JobStatus, LearnedMapping,
    MappingTable, TerminalResult,
};
use serde::Serialize;
use std::collections::BTreeMap;

/// Everything the reconciler knows about a job.
///
/// Replaced wholesale on each reconciliation pass; readers hold an `Arc` to
/// whichever version was current when they looked.
#[derive(Debug, Clone, PartialEq)]
pub struct JobState {
    pub job: Job,
    pub log: Vec<ExecutionLogEntry>,
    pub graph: ExecutionGraph,
    pub blocks: BTreeMap<BlockId, BlockExecutionState>,
    pub edges: BTreeMap<EdgeId, EdgeExecutionState>,
    pub payload: Option<JobPayload>,
    pub mappings: MappingTable,
    pub progress_percentage: f64,
    pub current_step_label: Option<String>,
    pub report_url: Option<String>,
}

impl JobState {
    pub fn new(job: Job, graph: ExecutionGraph) -> Self {
        let blocks = graph
            .blocks
            .iter()
            .map(|id| (id.clone(), BlockExecutionState::default()))
            .collect();
        let edges =
            graph.edges.iter().map(|e| (e.id.clone(), EdgeExecutionState::default())).collect();
        Self {
            job,
            log: Vec::new(),
            graph,
            blocks,
            edges,
            payload: None,
            mappings: MappingTable::new(),
            progress_percentage: 0.0,
            current_step_label: None,
            report_url: None,
        }
    }

    pub fn executing_block(&self) -> Option<&BlockId> {
        self.blocks.iter().find(|(_, b)| b.status == BlockStatus::Executing).map(|(id, _)| id)
    }

    pub fn snapshot(&self) -> JobSnapshot {
        JobSnapshot {
            job_id: self.job.id.clone(),
            kind: self.job.kind,
            phase: self.job.phase,
            status: self.job.status,
            progress_percentage: self.progress_percentage,
            current_step_label: self.current_step_label.clone(),
            block_states: self.blocks.clone(),
            edge_states: self.edges.clone(),
            terminal_result: self.job.terminal_result.clone(),
            payload: self.payload.clone(),
            log_len: self.log.len(),
            learned_mappings: self.mappings.iter().cloned().collect(),
        }
    }
}

/// The read surface handed to collaborators. Owned; mutating it changes
/// nothing in the store.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JobSnapshot {
    pub job_id: JobId,
    pub kind: JobKind,
    pub phase: JobPhase,
    pub status: JobStatus,
    pub progress_percentage: f64,
    pub current_step_label: Option<String>,
    pub block_states: BTreeMap<BlockId, BlockExecutionState>,
    pub edge_states: BTreeMap<EdgeId, EdgeExecutionState>,
    pub terminal_result: Option<TerminalResult>,
    pub payload: Option<JobPayload>,
    pub log_len: usize,
    pub learned_mappings: Vec<LearnedMapping>,
}
