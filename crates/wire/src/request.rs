// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Request bodies sent to the execution host.

use hw_core::{JobId, JobKind, RoutingHint, SessionId};
use serde::{Deserialize, Serialize};

/// Host endpoints. All take a JSON body via `POST`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    StartJob,
    PollStatus,
    CancelJob,
    ValidateNextItem,
}

impl Endpoint {
    pub fn path(self) -> &'static str {
        match self {
            Endpoint::StartJob => "/server/jobs/start",
            Endpoint::PollStatus => "/server/jobs/status",
            Endpoint::CancelJob => "/server/jobs/cancel",
            Endpoint::ValidateNextItem => "/server/validation/next",
        }
    }
}

hw_core::simple_display! {
    Endpoint {
        StartJob => "start-job",
        PollStatus => "poll-status",
        CancelJob => "cancel-job",
        ValidateNextItem => "validate-next-item",
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StartJobRequest {
    pub kind: JobKind,
    #[serde(default)]
    pub parameters: serde_json::Value,
    pub routing_hint: RoutingHint,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollStatusRequest {
    pub job_id: JobId,
    pub routing_hint: RoutingHint,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CancelJobRequest {
    pub job_id: JobId,
    pub routing_hint: RoutingHint,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidateNextRequest {
    pub session_id: SessionId,
    pub routing_hint: RoutingHint,
}
