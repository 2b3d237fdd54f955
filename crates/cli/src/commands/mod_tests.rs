// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use yare::parameterized;

fn args(device: Option<&str>, session: Option<&str>) -> HostArgs {
    HostArgs {
        host: "127.0.0.1:9000".to_string(),
        device: device.map(String::from),
        session: session.map(String::from),
    }
}

#[test]
fn routing_carries_every_hint() {
    let routing = args(Some("pixel-7"), Some("ctl-1")).routing();
    assert_eq!(routing.host, "127.0.0.1:9000");
    assert_eq!(routing.device.as_deref(), Some("pixel-7"));
    assert_eq!(routing.session.as_deref(), Some("ctl-1"));
    assert_eq!(routing.to_string(), "127.0.0.1:9000/pixel-7");
}

#[test]
fn routing_without_device() {
    assert_eq!(args(None, None).routing(), RoutingHint::new("127.0.0.1:9000"));
}

#[parameterized(
    ai = { "ai_task", JobKind::AiTask },
    dashed = { "test-case-run", JobKind::TestCaseRun },
    exploration = { "exploration", JobKind::ExplorationSession },
)]
fn kinds_parse(input: &str, expected: JobKind) {
    assert_eq!(parse_kind(input), Ok(expected));
}

#[test]
fn unknown_kind_is_rejected() {
    assert_eq!(parse_kind("deploy"), Err("unknown job kind: deploy".to_string()));
}

#[test]
fn host_adapter_targets_the_given_address() {
    let ctx = Context {
        config: EngineConfig::default(),
        token: Some("t0k".to_string()),
        format: OutputFormat::Text,
        desktop: false,
    };
    assert_eq!(ctx.host(&args(None, None)).addr(), "127.0.0.1:9000");
}
