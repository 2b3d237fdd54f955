// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! hw-core: data model for tracking remote jobs on an execution host

pub mod macros;

pub mod clock;
pub mod execution;
pub mod id;
pub mod job;
pub mod log_entry;
pub mod mapping;
pub mod notification;
pub mod payload;
pub mod routing;
pub mod time_fmt;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use clock::{Clock, FakeClock, SystemClock};
pub use execution::{
    BlockExecutionState, BlockStatus, EdgeExecutionState, EdgeStatus, ExecutionGraph, GraphEdge,
};
pub use id::{short, BlockId, EdgeId, JobId, PlanId, SessionId};
pub use job::{Job, JobKind, JobPhase, JobStatus, TerminalResult, UnknownJobKind};
pub use log_entry::{ActionType, EntryPayload, ExecutionLogEntry};
pub use mapping::{LearnedMapping, MappingTable};
pub use notification::{IdempotencyKey, Notification, NotificationKind};
pub use payload::{
    ExplorationProposal, JobPayload, PlanPayload, PlanStep, ProposedItem, StepResult, StepResults,
};
pub use routing::RoutingHint;
pub use time_fmt::{format_elapsed, format_elapsed_ms};
