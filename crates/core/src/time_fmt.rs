// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Human-readable durations for notifications and CLI output.

/// Format whole seconds as `45s`, `3m 12s`, `1h 5m`, or `2d 3h`.
pub fn format_elapsed(secs: u64) -> String {
    if secs < 60 {
        format!("{secs}s")
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else if secs < 86_400 {
        format!("{}h {}m", secs / 3600, (secs % 3600) / 60)
    } else {
        format!("{}d {}h", secs / 86_400, (secs % 86_400) / 3600)
    }
}

/// Like [`format_elapsed`], with sub-second durations shown in millis.
pub fn format_elapsed_ms(ms: u64) -> String {
    if ms < 1000 {
        return format!("{ms}ms");
    }
    format_elapsed(ms / 1000)
}
