// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! I/O adapters: the execution host's HTTP API and notification delivery.

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod host;
pub mod notify;

pub use host::{
    CancelError, HostAdapter, HttpHostAdapter, PollError, StartError, ValidateError,
};
pub use notify::{render_body, DesktopNotifyAdapter, NotifyAdapter, NotifyError};

#[cfg(any(test, feature = "test-support"))]
pub use host::{FakeHostAdapter, HostCall};
#[cfg(any(test, feature = "test-support"))]
pub use notify::FakeNotifyAdapter;
