// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Help and usage errors.

use crate::prelude::*;

#[test]
fn help_lists_commands() {
    cli()
        .args(&["--help"])
        .passes()
        .stdout_has("Usage:")
        .stdout_has("start")
        .stdout_has("watch")
        .stdout_has("cancel")
        .stdout_has("validate");
}

#[test]
fn start_help_shows_routing_flags() {
    cli()
        .args(&["start", "--help"])
        .passes()
        .stdout_has("--host")
        .stdout_has("--device")
        .stdout_has("--detach");
}

#[test]
fn version_shows_version() {
    cli().args(&["--version"]).passes().stdout_has("0.1");
}

#[test]
fn no_args_is_a_usage_error() {
    cli().exits(2).stderr_has("Usage:");
}

#[test]
fn unknown_kind_is_a_usage_error() {
    cli()
        .args(&["start", "--host", "127.0.0.1:1", "--kind", "deploy"])
        .exits(2)
        .stderr_has("unknown job kind: deploy");
}

#[test]
fn params_must_be_json_object() {
    cli()
        .args(&["start", "--host", "127.0.0.1:1", "--kind", "ai_task", "--params", "[1]"])
        .exits(2)
        .stderr_has("parameters must be a JSON object");
}
