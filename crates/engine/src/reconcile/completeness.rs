// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-kind rules for whether an incoming payload may replace the stored one.
//!
//! Intermediate polls can race during plan generation, so snapshot order is
//! not evidence of freshness. Each rule compares what the two payloads
//! contain instead.

use hw_core::{ExplorationProposal, JobKind, JobPayload, JobPhase, PlanPayload, StepResults};

pub trait CompletenessRule: Send + Sync {
    /// True when `incoming` carries more information than `stored`.
    /// Payloads of a different kind never supersede.
    fn supersedes(&self, stored: &JobPayload, incoming: &JobPayload) -> bool;
}

/// More steps wins; with equal steps, changed non-empty analysis wins.
pub struct PlanCompleteness;

/// More step results wins.
pub struct StepResultsCompleteness;

/// Later phase wins; within a phase, more proposed items wins.
pub struct ExplorationCompleteness;

impl PlanCompleteness {
    fn compare(stored: &PlanPayload, incoming: &PlanPayload) -> bool {
        match incoming.steps.len().cmp(&stored.steps.len()) {
            std::cmp::Ordering::Greater => true,
            std::cmp::Ordering::Less => false,
            std::cmp::Ordering::Equal => {
                !incoming.analysis.trim().is_empty() && incoming.analysis != stored.analysis
            }
        }
    }
}

impl CompletenessRule for PlanCompleteness {
    fn supersedes(&self, stored: &JobPayload, incoming: &JobPayload) -> bool {
        match (stored, incoming) {
            (JobPayload::Plan(s), JobPayload::Plan(i)) => Self::compare(s, i),
            _ => false,
        }
    }
}

impl StepResultsCompleteness {
    fn compare(stored: &StepResults, incoming: &StepResults) -> bool {
        incoming.results.len() > stored.results.len()
    }
}

impl CompletenessRule for StepResultsCompleteness {
    fn supersedes(&self, stored: &JobPayload, incoming: &JobPayload) -> bool {
        match (stored, incoming) {
            (JobPayload::StepResults(s), JobPayload::StepResults(i)) => Self::compare(s, i),
            _ => false,
        }
    }
}

impl ExplorationCompleteness {
    fn compare(stored: &ExplorationProposal, incoming: &ExplorationProposal) -> bool {
        let rank = |p: &ExplorationProposal| p.phase.map_or(0, JobPhase::rank);
        (rank(incoming), incoming.items.len()) > (rank(stored), stored.items.len())
    }
}

impl CompletenessRule for ExplorationCompleteness {
    fn supersedes(&self, stored: &JobPayload, incoming: &JobPayload) -> bool {
        match (stored, incoming) {
            (JobPayload::Exploration(s), JobPayload::Exploration(i)) => Self::compare(s, i),
            _ => false,
        }
    }
}

pub fn rule_for(kind: JobKind) -> &'static dyn CompletenessRule {
    match kind {
        JobKind::AiTask => &PlanCompleteness,
        JobKind::TestCaseRun => &StepResultsCompleteness,
        JobKind::ExplorationSession => &ExplorationCompleteness,
    }
}

/// Decide whether `incoming` should be stored, given what is stored now.
pub fn accepts(kind: JobKind, stored: Option<&JobPayload>, incoming: &JobPayload) -> bool {
    if incoming.job_kind() != kind {
        return false;
    }
    match stored {
        None => true,
        Some(stored) => rule_for(kind).supersedes(stored, incoming),
    }
}

#[cfg(test)]
#[path = "completeness_tests.rs"]
mod tests;
