// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use crate::prelude::*;

#[test]
fn cancel_reports_success() {
    let host = FakeHost::serve(&[("/server/jobs/cancel", r#"{"success": true}"#)]);
    cli()
        .args(&["cancel", "job-42", "--host", host.addr()])
        .passes()
        .stdout_has("Cancelled job job-42");
    assert_eq!(host.hits("/server/jobs/cancel"), 1);
}

#[test]
fn cancel_rejection_exits_one() {
    let host = FakeHost::serve(&[(
        "/server/jobs/cancel",
        r#"{"success": false, "error": "already finished"}"#,
    )]);
    cli()
        .args(&["cancel", "job-42", "--host", host.addr()])
        .exits(1)
        .stderr_has("already finished");
}
