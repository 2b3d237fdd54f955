// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! hw-engine: polling scheduler, execution-state reconciler, notification
//! deduplication, and the job session store.

pub mod config;
pub mod dedup;
pub mod env;
mod error;
pub mod notification;
mod orchestrator;
pub mod reconcile;
pub mod scheduler;
mod state;
pub mod store;
pub mod validator;

pub use config::{AdaptiveInterval, ConfigError, EngineConfig, PollPolicy};
pub use dedup::NotificationDeduplicator;
pub use error::{OrchestratorError, ReconciliationError, SchedulerError, ValidatorError};
pub use orchestrator::{JobRequest, Orchestrator};
pub use reconcile::completeness::{
    CompletenessRule, ExplorationCompleteness, PlanCompleteness, StepResultsCompleteness,
};
pub use reconcile::{reconcile, BlockTransition, JobEvent, Reconciliation};
pub use scheduler::{PollDecision, PollMachine, SchedulerState, SessionOutcome};
pub use state::{JobSnapshot, JobState};
pub use store::{JobSession, JobSessionStore};
pub use validator::{
    IncrementalValidator, RecordLayer, ValidationRecord, ValidationStep, ValidatorState,
};
