// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::exit_error::codes;
use hw_adapters::{FakeHostAdapter, FakeNotifyAdapter};
use hw_core::{JobId, JobKind, RoutingHint, SystemClock};
use hw_engine::{EngineConfig, JobRequest, SessionOutcome};
use hw_wire::StatusSnapshot;
use std::future::{pending, ready};

type TestOrchestrator = Orchestrator<FakeHostAdapter, FakeNotifyAdapter, SystemClock>;

fn status(status: &str, executing: bool) -> StatusSnapshot {
    StatusSnapshot {
        success: true,
        status: Some(status.into()),
        is_executing: Some(executing),
        ..StatusSnapshot::default()
    }
}

fn attached(host: &FakeHostAdapter) -> TestOrchestrator {
    let orchestrator = Orchestrator::new(
        host.clone(),
        FakeNotifyAdapter::new(),
        SystemClock,
        EngineConfig::default(),
    );
    orchestrator.attach(
        SLOT,
        JobId::new("J1"),
        JobRequest::new(JobKind::TestCaseRun, RoutingHint::new("gw")),
    );
    orchestrator
}

fn exit_code(result: anyhow::Result<()>) -> i32 {
    match result {
        Ok(()) => codes::SUCCESS,
        Err(e) => e.downcast_ref::<ExitError>().map(|x| x.code).unwrap_or(-1),
    }
}

#[tokio::test(start_paused = true)]
async fn completed_job_exits_cleanly() {
    let host = FakeHostAdapter::new();
    host.push_polls([Ok(status("running", true)), Ok(status("completed", false))]);
    let orchestrator = attached(&host);

    let result = follow(&orchestrator, OutputFormat::Text, pending()).await;
    assert_eq!(exit_code(result), codes::SUCCESS);
    assert_eq!(orchestrator.outcome(SLOT), Some(SessionOutcome::Completed));
}

#[tokio::test(start_paused = true)]
async fn failed_job_exits_with_failure_code() {
    let host = FakeHostAdapter::new();
    let mut failed = status("failed", false);
    failed.error = Some("assertion failed".into());
    host.push_polls([Ok(status("running", true)), Ok(failed)]);
    let orchestrator = attached(&host);

    let result = follow(&orchestrator, OutputFormat::Json, pending()).await;
    assert_eq!(exit_code(result), codes::JOB_FAILED);
}

#[tokio::test(start_paused = true)]
async fn vanished_job_exits_with_not_found_code() {
    let host = FakeHostAdapter::new();
    let orchestrator = attached(&host);

    let result = follow(&orchestrator, OutputFormat::Text, pending()).await;
    assert_eq!(exit_code(result), codes::NOT_FOUND);
    assert_eq!(host.poll_count(), 10);
}

#[tokio::test(start_paused = true)]
async fn interrupt_stops_local_polling_only() {
    let host = FakeHostAdapter::new();
    host.push_poll(Ok(status("running", true)));
    let orchestrator = attached(&host);

    let result = follow(&orchestrator, OutputFormat::Text, ready(())).await;
    assert_eq!(exit_code(result), codes::INTERRUPTED);
    assert_eq!(orchestrator.outcome(SLOT), Some(SessionOutcome::Stopped));
    assert_eq!(host.cancel_count(), 0);
}

#[tokio::test]
async fn empty_slot_is_an_error() {
    let orchestrator: TestOrchestrator = Orchestrator::new(
        FakeHostAdapter::new(),
        FakeNotifyAdapter::new(),
        SystemClock,
        EngineConfig::default(),
    );
    let err = follow(&orchestrator, OutputFormat::Text, pending()).await.unwrap_err();
    assert_eq!(err.to_string(), "no job is being followed");
}
