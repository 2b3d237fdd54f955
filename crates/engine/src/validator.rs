// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Incremental exploration validator.
//!
//! No poll loop: each [`IncrementalValidator::validate_next`] call is one
//! synchronous round-trip to the host that validates exactly one item.

use crate::error::ValidatorError;
use hw_adapters::{HostAdapter, ValidateError};
use hw_core::{EdgeId, RoutingHint, SessionId};
use hw_wire::{ActionSetResult, EdgeLayer, Progress, ValidateNextResponse};
use serde::Serialize;
use std::collections::BTreeSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidatorState {
    Idle,
    /// Validating the item at this position, counted in distinct host step
    /// indexes so it tracks `progress().current`. A failed call leaves it
    /// here so the same item can be retried.
    Validating(u32),
    Complete,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordLayer {
    /// Single-layer navigation: one action set.
    Single,
    Horizontal,
    Vertical,
}

impl From<EdgeLayer> for RecordLayer {
    fn from(layer: EdgeLayer) -> Self {
        match layer {
            EdgeLayer::Horizontal => RecordLayer::Horizontal,
            EdgeLayer::Vertical => RecordLayer::Vertical,
        }
    }
}

hw_core::simple_display! {
    RecordLayer {
        Single => "single",
        Horizontal => "horizontal",
        Vertical => "vertical",
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationRecord {
    pub step_index: u32,
    pub label: String,
    pub layer: RecordLayer,
    pub success: bool,
    pub edge_id: Option<EdgeId>,
    pub action_sets: Vec<ActionSetResult>,
    pub message: Option<String>,
}

/// What one `validate_next` call produced.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationStep {
    pub records: Vec<ValidationRecord>,
    pub progress: Progress,
    pub has_more_items: bool,
}

pub struct IncrementalValidator<H> {
    host: H,
    session_id: SessionId,
    routing: RoutingHint,
    state: ValidatorState,
    records: Vec<ValidationRecord>,
    validated: BTreeSet<u32>,
    total: u32,
}

impl<H: HostAdapter> IncrementalValidator<H> {
    pub fn new(host: H, session_id: SessionId, routing: RoutingHint) -> Self {
        Self {
            host,
            session_id,
            routing,
            state: ValidatorState::Idle,
            records: Vec::new(),
            validated: BTreeSet::new(),
            total: 0,
        }
    }

    pub fn state(&self) -> ValidatorState {
        self.state
    }

    pub fn records(&self) -> &[ValidationRecord] {
        &self.records
    }

    /// `current` counts distinct validated step indexes.
    pub fn progress(&self) -> Progress {
        let current = self.validated.len() as u32;
        Progress { current, total: self.total.max(current), percentage: None }
    }

    pub fn is_finished(&self) -> bool {
        matches!(self.state, ValidatorState::Complete | ValidatorState::Failed)
    }

    pub async fn validate_next(&mut self) -> Result<ValidationStep, ValidatorError> {
        let index = match self.state {
            ValidatorState::Idle => 0,
            ValidatorState::Validating(i) => i,
            ValidatorState::Complete | ValidatorState::Failed => {
                return Err(ValidatorError::Finished);
            }
        };
        self.state = ValidatorState::Validating(index);

        let response = match self.host.validate_next(&self.session_id, &self.routing).await {
            Ok(response) => response,
            Err(ValidateError::NotFound(message)) => {
                tracing::warn!(session_id = %self.session_id, %message, "validation session lost");
                self.state = ValidatorState::Failed;
                return Err(ValidatorError::SessionLost(message));
            }
            Err(err) => {
                tracing::warn!(session_id = %self.session_id, index, error = %err, "validation failed");
                return Err(ValidatorError::Host(err));
            }
        };

        let records = records_for(&response, index);
        if let Some(step) = records.first().map(|r| r.step_index) {
            self.validated.insert(step);
        }
        if let Some(total) = response.progress.map(|p| p.total) {
            self.total = total;
        }
        self.records.extend(records.iter().cloned());

        self.state = if response.has_more_items {
            ValidatorState::Validating(self.progress().current)
        } else {
            ValidatorState::Complete
        };
        tracing::info!(
            session_id = %self.session_id,
            index,
            records = records.len(),
            has_more = response.has_more_items,
            "validated item"
        );
        Ok(ValidationStep { records, progress: self.progress(), has_more_items: response.has_more_items })
    }
}

/// One record per edge for dual-layer items, else one single-layer record.
fn records_for(response: &ValidateNextResponse, index: u32) -> Vec<ValidationRecord> {
    let Some(item) = &response.item else {
        return Vec::new();
    };
    if !response.edges.is_empty() {
        return response
            .edges
            .iter()
            .map(|edge| ValidationRecord {
                step_index: item.step_index,
                label: item.label.clone(),
                layer: edge.layer.into(),
                success: edge.success,
                edge_id: edge.edge_id.clone(),
                action_sets: edge.action_sets.clone(),
                message: edge.message.clone(),
            })
            .collect();
    }
    tracing::debug!(index, step = item.step_index, "single-layer item");
    vec![ValidationRecord {
        step_index: item.step_index,
        label: item.label.clone(),
        layer: RecordLayer::Single,
        success: response.action_sets.iter().all(|a| a.success),
        edge_id: None,
        action_sets: response.action_sets.clone(),
        message: response.action_sets.iter().find(|a| !a.success).and_then(|a| a.message.clone()),
    }]
}

#[cfg(test)]
#[path = "validator_tests.rs"]
mod tests;
