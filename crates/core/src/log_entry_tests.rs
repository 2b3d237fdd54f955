// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[yare::parameterized(
    started   = { "step_started", ActionType::StepStarted },
    success   = { "step_success", ActionType::StepSuccess },
    failed    = { "step_failed", ActionType::StepFailed },
    completed = { "task_completed", ActionType::TaskCompleted },
    task_fail = { "task_failed", ActionType::TaskFailed },
    plan      = { "plan_generated", ActionType::PlanGenerated },
)]
fn known_action_types(raw: &str, expected: ActionType) {
    assert_eq!(ActionType::from(raw), expected);
    assert_eq!(expected.as_str(), raw);
}

#[test]
fn unknown_action_type_is_preserved() {
    let action: ActionType = serde_json::from_str("\"screenshot_taken\"").unwrap();
    assert_eq!(action, ActionType::Other("screenshot_taken".into()));
    assert_eq!(serde_json::to_string(&action).unwrap(), "\"screenshot_taken\"");
}

#[test]
fn only_task_entries_are_terminal() {
    assert_eq!(ActionType::TaskCompleted.terminal_success(), Some(true));
    assert_eq!(ActionType::TaskFailed.terminal_success(), Some(false));
    assert_eq!(ActionType::StepFailed.terminal_success(), None);
}

#[test]
fn payload_ignores_unknown_fields() {
    let payload: EntryPayload =
        serde_json::from_str(r#"{"step": 3, "duration_ms": 40, "screenshot": "x.png"}"#).unwrap();
    assert_eq!(payload.step, Some(3));
    assert_eq!(payload.duration_ms, Some(40));
}

#[test]
fn step_label_falls_back_to_block_then_step() {
    let mut entry = ExecutionLogEntry {
        position: 0,
        action_type: ActionType::StepSuccess,
        payload: EntryPayload { step: Some(2), ..EntryPayload::default() },
        timestamp_ms: None,
    };
    assert_eq!(entry.step_label().as_deref(), Some("step 2"));

    entry.payload.block_id = Some(BlockId::new("login"));
    assert_eq!(entry.step_label().as_deref(), Some("login"));

    entry.payload.label = Some("Open login page".into());
    assert_eq!(entry.step_label().as_deref(), Some("Open login page"));
}
