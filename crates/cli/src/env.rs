// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for the CLI.
//!
//! Engine tuning variables (`HW_POLL_INTERVAL_MS` and friends) are read by
//! `hw_engine::env`; this module covers the process-level ones.

use std::path::PathBuf;

fn non_empty(var: &str) -> Option<String> {
    std::env::var(var).ok().filter(|s| !s.trim().is_empty())
}

/// Log filter directive (`HW_LOG`), e.g. `debug` or `hw_engine=trace`
pub fn log_filter() -> Option<String> {
    non_empty("HW_LOG")
}

/// Directory for rolling log files (`HW_LOG_DIR`)
pub fn log_dir() -> Option<PathBuf> {
    non_empty("HW_LOG_DIR").map(PathBuf::from)
}

/// Bearer token for the host (`HW_TOKEN`)
pub fn token() -> Option<String> {
    non_empty("HW_TOKEN")
}

/// Explicit config file (`HW_CONFIG`)
pub fn config_path() -> Option<PathBuf> {
    non_empty("HW_CONFIG").map(PathBuf::from)
}

/// `~/.config/hw/config.toml` (or the platform equivalent), if present.
pub fn default_config_path() -> Option<PathBuf> {
    let path = dirs::config_dir()?.join("hw").join("config.toml");
    path.is_file().then_some(path)
}
