// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for the engine crate.
//!
//! Every override applies to all job kinds; per-kind tuning goes in the
//! config file.

use std::time::Duration;

fn millis(var: &str) -> Option<Duration> {
    std::env::var(var).ok().and_then(|s| s.trim().parse::<u64>().ok()).map(Duration::from_millis)
}

fn count(var: &str) -> Option<u32> {
    std::env::var(var).ok().and_then(|s| s.trim().parse::<u32>().ok())
}

/// Poll interval override (`HW_POLL_INTERVAL_MS`)
pub fn poll_interval() -> Option<Duration> {
    millis("HW_POLL_INTERVAL_MS")
}

/// Wall-clock budget override (`HW_MAX_DURATION_MS`)
pub fn max_duration() -> Option<Duration> {
    millis("HW_MAX_DURATION_MS")
}

/// Consecutive transient-failure ceiling (`HW_MAX_FAILURES`)
pub fn max_failures() -> Option<u32> {
    count("HW_MAX_FAILURES")
}

/// Consecutive not-found ceiling (`HW_MAX_NOT_FOUND`)
pub fn max_not_found() -> Option<u32> {
    count("HW_MAX_NOT_FOUND")
}

/// Per-request HTTP timeout (`HW_REQUEST_TIMEOUT_MS`)
pub fn request_timeout() -> Option<Duration> {
    millis("HW_REQUEST_TIMEOUT_MS")
}
