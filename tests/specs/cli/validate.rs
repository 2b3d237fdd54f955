// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use crate::prelude::*;

#[test]
fn validate_prints_one_line_per_record() {
    let host = FakeHost::serve(&[(
        "/server/validation/next",
        r#"{"success": true, "item": {"step_index": 0, "label": "home"},
            "action_sets": [{"action": "tap", "success": true}],
            "progress": {"current": 1, "total": 1}, "has_more_items": false}"#,
    )]);
    cli()
        .args(&["validate", "S1", "--host", host.addr()])
        .passes()
        .stdout_has("[1/1] step 0 home (single) ok")
        .stdout_has("Validated 1 records, 0 failed");
}

#[test]
fn unknown_session_exits_three() {
    let host = FakeHost::serve(&[]);
    cli().args(&["validate", "S1", "--host", host.addr()]).exits(3).stderr_has("session lost");
}
