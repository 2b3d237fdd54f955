// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Status client for the execution host.
//!
//! The `HostAdapter` trait covers the four host operations (start, poll,
//! cancel, validate-next) and classifies failures so the scheduler can tell
//! "host has no record of this job" from "host is briefly unhealthy" from
//! "network is down".

mod client;
pub mod http;

#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeHostAdapter, HostCall};

pub use client::HttpHostAdapter;

use async_trait::async_trait;
use hw_core::{JobId, JobKind, RoutingHint, SessionId};
use hw_wire::{StatusSnapshot, ValidateNextResponse};
use thiserror::Error;

/// Errors from starting a job. Surfaced immediately; no polling follows.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StartError {
    #[error("start rejected: {0}")]
    Rejected(String),
    #[error("transport error: {0}")]
    Transport(String),
}

/// Errors from one poll. Retried by the scheduler up to its ceilings.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PollError {
    /// Host has no record of the job (HTTP 404 or a "not found" body).
    #[error("job not found: {0}")]
    NotFound(String),
    /// HTTP-layer error other than 404, or a `success: false` body.
    #[error("HTTP {status}: {message}")]
    Transient { status: u16, message: String },
    /// Body could not be decoded as a status snapshot.
    #[error("malformed snapshot: {0}")]
    Malformed(String),
    #[error("transport error: {0}")]
    Transport(String),
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CancelError {
    #[error("cancel rejected: {0}")]
    Rejected(String),
    #[error("transport error: {0}")]
    Transport(String),
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidateError {
    /// Host has no record of the validation session.
    #[error("validation session not found: {0}")]
    NotFound(String),
    #[error("validation failed: {0}")]
    Rejected(String),
    #[error("transport error: {0}")]
    Transport(String),
}

/// Adapter for talking to an execution host.
///
/// Every call takes the routing hint explicitly; implementations must send
/// it with the request.
#[async_trait]
pub trait HostAdapter: Clone + Send + Sync + 'static {
    async fn start(
        &self,
        kind: JobKind,
        parameters: serde_json::Value,
        routing: &RoutingHint,
    ) -> Result<JobId, StartError>;

    async fn poll(
        &self,
        job_id: &JobId,
        routing: &RoutingHint,
    ) -> Result<StatusSnapshot, PollError>;

    /// Best-effort: the job may already have finished host-side.
    async fn cancel(&self, job_id: &JobId, routing: &RoutingHint) -> Result<(), CancelError>;

    async fn validate_next(
        &self,
        session_id: &SessionId,
        routing: &RoutingHint,
    ) -> Result<ValidateNextResponse, ValidateError>;
}

/// Hosts report missing jobs in `success: false` bodies as free text.
pub(crate) fn is_not_found_message(message: &str) -> bool {
    let lower = message.to_ascii_lowercase();
    lower.contains("not found") || lower.contains("not_found") || lower.contains("no such job")
}
