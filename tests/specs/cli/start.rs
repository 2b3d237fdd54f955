// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `hw start` and `hw watch` against a fake host.

use crate::prelude::*;

const STARTED: &str = r#"{"success": true, "job_id": "job-42"}"#;
const COMPLETED: &str = r#"{"success": true, "status": "completed", "is_executing": false, "report_url": "https://reports/job-42"}"#;
const FAILED: &str = r#"{"success": true, "status": "failed", "is_executing": false, "error": "assertion failed"}"#;

#[test]
fn start_follows_job_to_completion() {
    let host = FakeHost::serve(&[("/server/jobs/start", STARTED), ("/server/jobs/status", COMPLETED)]);
    cli()
        .args(&["start", "--host", host.addr(), "--kind", "test_case_run", "--device", "pixel"])
        .env("HW_POLL_INTERVAL_MS", "20")
        .passes()
        .stdout_has("Started test_case_run job job-42")
        .stdout_has("Job job-42 completed")
        .stdout_has("Report: https://reports/job-42");
    assert_eq!(host.hits("/server/jobs/start"), 1);
}

#[test]
fn failed_job_exits_one() {
    let host = FakeHost::serve(&[("/server/jobs/start", STARTED), ("/server/jobs/status", FAILED)]);
    cli()
        .args(&["start", "--host", host.addr(), "--kind", "ai_task"])
        .env("HW_POLL_INTERVAL_MS", "20")
        .exits(1)
        .stdout_has("failed")
        .stderr_has("assertion failed");
}

#[test]
fn detach_prints_id_without_polling() {
    let host = FakeHost::serve(&[("/server/jobs/start", STARTED)]);
    let run = cli()
        .args(&["start", "--host", host.addr(), "--kind", "exploration", "--detach", "-o", "json"])
        .passes();
    let value: serde_json::Value = serde_json::from_str(run.stdout().trim()).unwrap();
    assert_eq!(value["job_id"], "job-42");
    assert_eq!(host.hits("/server/jobs/status"), 0);
}

#[test]
fn unreachable_host_is_start_rejected() {
    cli()
        .args(&["start", "--host", &closed_addr(), "--kind", "test_case_run"])
        .exits(4)
        .stderr_has("start rejected");
}

#[test]
fn rejected_start_exits_four() {
    let host = FakeHost::serve(&[(
        "/server/jobs/start",
        r#"{"success": false, "error": "device offline"}"#,
    )]);
    cli()
        .args(&["start", "--host", host.addr(), "--kind", "test_case_run"])
        .exits(4)
        .stderr_has("device offline");
}

#[test]
fn watch_gives_up_when_host_forgets_job() {
    let host = FakeHost::serve(&[]);
    cli()
        .args(&["watch", "job-9", "--host", host.addr(), "--kind", "test_case_run"])
        .env("HW_POLL_INTERVAL_MS", "5")
        .exits(3)
        .stdout_has("host no longer reports it");
    assert_eq!(host.hits("/server/jobs/status"), 10);
}

#[test]
fn invalid_config_file_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("hw.toml");
    std::fs::write(&path, "[poll.ai_task]\ninterval_ms = 0\n").unwrap();
    cli()
        .args(&["--config", path.to_str().unwrap(), "cancel", "job-1", "--host", "127.0.0.1:1"])
        .exits(1)
        .stderr_has("interval_ms must be > 0");
}
