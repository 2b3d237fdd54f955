// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Engine error types

use hw_adapters::{CancelError, StartError, ValidateError};
use std::time::Duration;
use thiserror::Error;

/// A snapshot that cannot be merged. The snapshot is skipped and the
/// previous state retained.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ReconciliationError {
    #[error("malformed log entry at position {position}: {reason}")]
    Malformed { position: usize, reason: String },
    #[error("execution log shrank from {stored} to {received} entries")]
    LogRegressed { stored: usize, received: usize },
}

/// Why the scheduler gave up on a job that never reached a terminal state.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SchedulerError {
    #[error("timed out after {elapsed:?} (budget {budget:?})")]
    TimedOut { elapsed: Duration, budget: Duration },
    #[error("abandoned after {attempts} consecutive failed polls: {last_error}")]
    Abandoned { attempts: u32, last_error: String },
}

#[derive(Debug, Error)]
pub enum OrchestratorError {
    #[error(transparent)]
    Start(#[from] StartError),
    #[error(transparent)]
    Cancel(#[from] CancelError),
    #[error("no job tracked in slot '{0}'")]
    UnknownSlot(String),
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidatorError {
    /// Session already complete or failed; no request was sent.
    #[error("validation session already finished")]
    Finished,
    /// Host no longer knows the session; the validator is now `Failed`.
    #[error("validation session lost: {0}")]
    SessionLost(String),
    /// Current item failed; retrying validates the same item again.
    #[error(transparent)]
    Host(ValidateError),
}
