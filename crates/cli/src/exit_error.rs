// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Custom error type that carries a process exit code.
//!
//! Commands return `ExitError` instead of calling `std::process::exit()`
//! directly, allowing `main()` to flush logs before terminating.

use hw_engine::SessionOutcome;
use std::fmt;

pub mod codes {
    pub const SUCCESS: i32 = 0;
    pub const JOB_FAILED: i32 = 1;
    pub const TIMED_OUT: i32 = 2;
    /// Host lost the job, or polling was abandoned.
    pub const NOT_FOUND: i32 = 3;
    pub const START_REJECTED: i32 = 4;
    pub const INTERRUPTED: i32 = 130;
}

#[derive(Debug)]
pub struct ExitError {
    pub code: i32,
    pub message: String,
}

impl ExitError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self { code, message: message.into() }
    }

    pub fn interrupted() -> Self {
        Self::new(codes::INTERRUPTED, "interrupted")
    }

    /// Map a finished tracking session to the process result.
    ///
    /// `detail` is appended to the message for non-successful outcomes.
    pub fn from_outcome(outcome: SessionOutcome, detail: Option<&str>) -> Result<(), Self> {
        let code = exit_code(outcome);
        if code == codes::SUCCESS {
            return Ok(());
        }
        let message = match detail {
            Some(detail) => format!("job {outcome}: {detail}"),
            None => format!("job {outcome}"),
        };
        Err(Self::new(code, message))
    }
}

pub fn exit_code(outcome: SessionOutcome) -> i32 {
    match outcome {
        SessionOutcome::Completed => codes::SUCCESS,
        SessionOutcome::Failed => codes::JOB_FAILED,
        SessionOutcome::TimedOut => codes::TIMED_OUT,
        SessionOutcome::Abandoned => codes::NOT_FOUND,
        SessionOutcome::Stopped => codes::INTERRUPTED,
    }
}

impl fmt::Display for ExitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ExitError {}

#[cfg(test)]
#[path = "exit_error_tests.rs"]
mod tests;
