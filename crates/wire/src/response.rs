// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Response bodies returned by the execution host.
//!
//! Every field except `success` is optional on the wire; hosts omit what
//! they do not track for a given job kind.

use hw_core::{
    BlockId, EdgeId, ExplorationProposal, LearnedMapping, PlanPayload, StepResult,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StartJobResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// One log entry as the host sends it. `data` is decoded by the reconciler.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawLogEntry {
    pub action_type: String,
    #[serde(default)]
    pub data: serde_json::Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp_ms: Option<u64>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Progress {
    pub current: u32,
    pub total: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub percentage: Option<f64>,
}

impl Progress {
    /// Host percentage if given, else `current / total`.
    pub fn percent(&self) -> Option<f64> {
        if let Some(p) = self.percentage {
            return Some(p);
        }
        if self.total == 0 {
            return None;
        }
        Some(f64::from(self.current) / f64::from(self.total) * 100.0)
    }
}

/// Full state returned by one poll: the snapshot the reconciler consumes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatusSnapshot {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_executing: Option<bool>,
    #[serde(default)]
    pub execution_log: Vec<RawLogEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phase: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plan: Option<PlanPayload>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step_results: Option<Vec<StepResult>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exploration: Option<ExplorationProposal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progress: Option<Progress>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_block_id: Option<BlockId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_step_label: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub learned_mappings: Vec<LearnedMapping>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub report_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CancelJobResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Result of running one action set against the target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionSetResult {
    pub action: String,
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeLayer {
    Horizontal,
    Vertical,
}

hw_core::simple_display! {
    EdgeLayer {
        Horizontal => "horizontal",
        Vertical => "vertical",
    }
}

/// One independently validated edge of a dual-layer item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeValidation {
    pub layer: EdgeLayer,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edge_id: Option<EdgeId>,
    pub success: bool,
    #[serde(default)]
    pub action_sets: Vec<ActionSetResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationItem {
    pub step_index: u32,
    #[serde(default)]
    pub label: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidateNextResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item: Option<ValidationItem>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub action_sets: Vec<ActionSetResult>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub edges: Vec<EdgeValidation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progress: Option<Progress>,
    #[serde(default)]
    pub has_more_items: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
