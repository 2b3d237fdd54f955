// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Kind-specific progress payloads.

use crate::id::{BlockId, PlanId};
use crate::job::{JobKind, JobPhase};
use serde::{Deserialize, Deserializer, Serialize};

/// Structured progress a job surfaces, one variant per [`JobKind`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "data", rename_all = "snake_case")]
pub enum JobPayload {
    Plan(PlanPayload),
    StepResults(StepResults),
    Exploration(ExplorationProposal),
}

impl JobPayload {
    pub fn job_kind(&self) -> JobKind {
        match self {
            JobPayload::Plan(_) => JobKind::AiTask,
            JobPayload::StepResults(_) => JobKind::TestCaseRun,
            JobPayload::Exploration(_) => JobKind::ExplorationSession,
        }
    }
}

/// Plan generated for an AI task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanPayload {
    pub plan_id: PlanId,
    #[serde(default)]
    pub analysis: String,
    #[serde(default)]
    pub steps: Vec<PlanStep>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanStep {
    pub index: u32,
    #[serde(default)]
    pub label: String,
}

/// Per-step results of a test-case run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StepResults {
    pub results: Vec<StepResult>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepResult {
    pub step: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_id: Option<BlockId>,
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Proposal produced by an exploration session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExplorationProposal {
    /// `None` when the host sent no phase or one this client does not know.
    #[serde(default, deserialize_with = "host_phase", skip_serializing_if = "Option::is_none")]
    pub phase: Option<JobPhase>,
    #[serde(default)]
    pub analysis: String,
    #[serde(default)]
    pub items: Vec<ProposedItem>,
}

/// Accepts any phase spelling [`JobPhase::from_host`] knows.
fn host_phase<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<JobPhase>, D::Error> {
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(raw.as_ref().and_then(serde_json::Value::as_str).and_then(JobPhase::from_host))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProposedItem {
    pub id: String,
    #[serde(default)]
    pub label: String,
}

#[cfg(test)]
#[path = "payload_tests.rs"]
mod tests;
