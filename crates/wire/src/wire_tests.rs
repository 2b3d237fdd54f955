// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Wire contract tests: decoding realistic host bodies.

use super::*;
use hw_core::{JobId, JobKind, RoutingHint};

#[test]
fn start_request_carries_routing_hint() {
    let request = StartJobRequest {
        kind: JobKind::TestCaseRun,
        parameters: serde_json::json!({"testcase_id": "tc-1"}),
        routing_hint: RoutingHint::new("host-a").device("device1"),
    };
    let json: serde_json::Value = serde_json::from_str(&encode(&request).unwrap()).unwrap();
    assert_eq!(json["kind"], "test_case_run");
    assert_eq!(json["routing_hint"]["host"], "host-a");
    assert_eq!(json["routing_hint"]["device"], "device1");
    assert!(json["routing_hint"].get("session").is_none());
}

#[test]
fn poll_request_serializes_job_id_as_string() {
    let request = PollStatusRequest { job_id: JobId::new("J1"), routing_hint: RoutingHint::new("h") };
    let json = encode(&request).unwrap();
    assert!(json.contains(r#""job_id":"J1""#), "{json}");
}

#[test]
fn minimal_status_snapshot_decodes() {
    let snapshot: StatusSnapshot = decode(r#"{"success": true}"#).unwrap();
    assert!(snapshot.success);
    assert!(snapshot.execution_log.is_empty());
    assert_eq!(snapshot.is_executing, None);
}

#[test]
fn full_status_snapshot_decodes() {
    let body = r#"{
        "success": true,
        "status": "running",
        "is_executing": true,
        "execution_log": [
            {"action_type": "step_started", "data": {"block_id": "b1"}},
            {"action_type": "step_success", "data": {"block_id": "b1", "duration_ms": 120}},
            {"action_type": "screenshot"}
        ],
        "progress": {"current": 1, "total": 4},
        "current_block_id": "b2",
        "report_url": "http://host/reports/J1"
    }"#;
    let snapshot: StatusSnapshot = decode(body).unwrap();
    assert_eq!(snapshot.execution_log.len(), 3);
    assert_eq!(snapshot.execution_log[2].data, serde_json::Value::Null);
    assert_eq!(snapshot.progress.unwrap().percent(), Some(25.0));
    assert_eq!(snapshot.current_block_id.unwrap(), "b2");
}

#[test]
fn exploration_phase_alias_decodes() {
    let body = r#"{
        "success": true,
        "phase": "exploring",
        "exploration": {"phase": "validating", "items": [{"id": "i1", "label": "Login"}]}
    }"#;
    let snapshot: StatusSnapshot = decode(body).unwrap();
    let proposal = snapshot.exploration.unwrap();
    assert_eq!(proposal.phase, Some(hw_core::JobPhase::Validation));
    assert_eq!(proposal.items.len(), 1);
}

#[test]
fn empty_body_is_protocol_error() {
    let err = decode::<StatusSnapshot>("  \n").unwrap_err();
    assert!(matches!(err, ProtocolError::Empty));
}

#[test]
fn malformed_body_is_protocol_error() {
    let err = decode::<StatusSnapshot>("<html>502</html>").unwrap_err();
    assert!(matches!(err, ProtocolError::Json(_)));
}

#[yare::parameterized(
    explicit   = { Progress { current: 1, total: 3, percentage: Some(50.0) }, Some(50.0) },
    derived    = { Progress { current: 3, total: 4, percentage: None }, Some(75.0) },
    zero_total = { Progress { current: 0, total: 0, percentage: None }, None },
)]
fn progress_percent(progress: Progress, expected: Option<f64>) {
    assert_eq!(progress.percent(), expected);
}

#[test]
fn dual_layer_validation_response_decodes() {
    let body = r#"{
        "success": true,
        "item": {"step_index": 2, "label": "Menu > Settings"},
        "edges": [
            {"layer": "horizontal", "edge_id": "h-2", "success": true,
             "action_sets": [{"action": "press_right", "success": true}]},
            {"layer": "vertical", "success": false, "message": "no focus change"}
        ],
        "progress": {"current": 2, "total": 9},
        "has_more_items": true
    }"#;
    let response: ValidateNextResponse = decode(body).unwrap();
    assert_eq!(response.edges.len(), 2);
    assert_eq!(response.edges[0].layer, EdgeLayer::Horizontal);
    assert!(response.action_sets.is_empty());
    assert!(response.has_more_items);
}

#[yare::parameterized(
    start    = { Endpoint::StartJob, "/server/jobs/start" },
    poll     = { Endpoint::PollStatus, "/server/jobs/status" },
    cancel   = { Endpoint::CancelJob, "/server/jobs/cancel" },
    validate = { Endpoint::ValidateNextItem, "/server/validation/next" },
)]
fn endpoint_paths(endpoint: Endpoint, path: &str) {
    assert_eq!(endpoint.path(), path);
}
