// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-block and per-edge execution state for graph-based runs.

use crate::id::{BlockId, EdgeId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockStatus {
    #[default]
    Idle,
    Pending,
    Executing,
    Success,
    Failure,
    Error,
}

crate::simple_display! {
    BlockStatus {
        Idle => "idle",
        Pending => "pending",
        Executing => "executing",
        Success => "success",
        Failure => "failure",
        Error => "error",
    }
}

impl BlockStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, BlockStatus::Success | BlockStatus::Failure | BlockStatus::Error)
    }

    pub fn is_failed(self) -> bool {
        matches!(self, BlockStatus::Failure | BlockStatus::Error)
    }
}

/// Execution state of one node in a test-case graph.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BlockExecutionState {
    pub status: BlockStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time_ms: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time_ms: Option<u64>,
    /// Duration reported by the host; wins over `end - start`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explicit_duration_ms: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<serde_json::Value>,
}

impl BlockExecutionState {
    pub fn pending() -> Self {
        Self { status: BlockStatus::Pending, ..Self::default() }
    }

    pub fn duration_ms(&self) -> Option<u64> {
        if let Some(explicit) = self.explicit_duration_ms {
            return Some(explicit);
        }
        match (self.start_time_ms, self.end_time_ms) {
            (Some(start), Some(end)) => Some(end.saturating_sub(start)),
            _ => None,
        }
    }

    pub fn start(&mut self, now_ms: u64) {
        self.status = BlockStatus::Executing;
        self.start_time_ms.get_or_insert(now_ms);
        self.end_time_ms = None;
    }

    /// Close the block with a terminal status. No-op if already terminal.
    pub fn finish(&mut self, status: BlockStatus, now_ms: u64) -> bool {
        if self.status.is_terminal() || !status.is_terminal() {
            return false;
        }
        self.status = status;
        self.end_time_ms = Some(now_ms);
        true
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeStatus {
    #[default]
    Idle,
    Active,
    Success,
    Failure,
}

crate::simple_display! {
    EdgeStatus {
        Idle => "idle",
        Active => "active",
        Success => "success",
        Failure => "failure",
    }
}

/// Visual annotation on a graph edge; never consulted for job completion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeExecutionState {
    pub status: EdgeStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphEdge {
    pub id: EdgeId,
    pub source: BlockId,
    pub target: BlockId,
}

/// Shape of a test-case graph, supplied by the caller at start.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionGraph {
    pub blocks: Vec<BlockId>,
    #[serde(default)]
    pub edges: Vec<GraphEdge>,
}

impl ExecutionGraph {
    pub fn new(blocks: impl IntoIterator<Item = impl Into<BlockId>>) -> Self {
        Self { blocks: blocks.into_iter().map(Into::into).collect(), edges: Vec::new() }
    }

    pub fn edge(
        mut self,
        id: impl Into<EdgeId>,
        source: impl Into<BlockId>,
        target: impl Into<BlockId>,
    ) -> Self {
        self.edges.push(GraphEdge { id: id.into(), source: source.into(), target: target.into() });
        self
    }
}

#[cfg(test)]
#[path = "execution_tests.rs"]
mod tests;
