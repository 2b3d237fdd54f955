// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Notification delivery.
//!
//! Deduplication happens upstream in the engine; adapters deliver whatever
//! they are handed.

use async_trait::async_trait;
use hw_core::Notification;
use thiserror::Error;

/// Errors from notify operations
#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("send failed: {0}")]
    SendFailed(String),
}

/// Adapter for delivering user-facing notifications
#[async_trait]
pub trait NotifyAdapter: Clone + Send + Sync + 'static {
    async fn notify(&self, notification: &Notification) -> Result<(), NotifyError>;
}

/// Desktop notification adapter using notify-rust.
///
/// On macOS, `notify-rust` looks up a bundle identifier through AppleScript
/// on first use, which blocks forever in processes without Automation
/// permissions. The identifier is pre-set at construction.
#[derive(Clone, Copy, Debug, Default)]
pub struct DesktopNotifyAdapter;

impl DesktopNotifyAdapter {
    pub fn new() -> Self {
        #[cfg(target_os = "macos")]
        {
            let _ = mac_notification_sys::set_application("com.apple.Terminal");
        }
        Self
    }
}

/// Body text shown to the user: the message plus the report link, if any.
pub fn render_body(notification: &Notification) -> String {
    match &notification.report_url {
        Some(url) => format!("{}\n{url}", notification.message),
        None => notification.message.clone(),
    }
}

#[async_trait]
impl NotifyAdapter for DesktopNotifyAdapter {
    async fn notify(&self, notification: &Notification) -> Result<(), NotifyError> {
        let title = notification.title.clone();
        let body = render_body(notification);
        let key = notification.key.to_string();
        // show() is synchronous on macOS; keep it off the async workers
        tokio::task::spawn_blocking(move || {
            match notify_rust::Notification::new().summary(&title).body(&body).show() {
                Ok(_) => tracing::info!(%key, %title, "desktop notification sent"),
                Err(e) => tracing::warn!(%key, error = %e, "desktop notification failed"),
            }
        });
        Ok(())
    }
}

#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(coverage_nightly, coverage(off))]
mod fake {
    use super::{NotifyAdapter, NotifyError};
    use async_trait::async_trait;
    use hw_core::{Notification, NotificationKind};
    use parking_lot::Mutex;
    use std::sync::Arc;

    /// Fake notification adapter for testing
    #[derive(Clone, Default)]
    pub struct FakeNotifyAdapter {
        sent: Arc<Mutex<Vec<Notification>>>,
        fail: Arc<Mutex<bool>>,
    }

    impl FakeNotifyAdapter {
        pub fn new() -> Self {
            Self::default()
        }

        /// Make every subsequent send fail (after recording it).
        pub fn set_failing(&self, fail: bool) {
            *self.fail.lock() = fail;
        }

        /// All notifications delivered so far, in order
        pub fn sent(&self) -> Vec<Notification> {
            self.sent.lock().clone()
        }

        pub fn count_of(&self, kind: NotificationKind) -> usize {
            self.sent.lock().iter().filter(|n| n.kind == kind).count()
        }
    }

    #[async_trait]
    impl NotifyAdapter for FakeNotifyAdapter {
        async fn notify(&self, notification: &Notification) -> Result<(), NotifyError> {
            self.sent.lock().push(notification.clone());
            if *self.fail.lock() {
                return Err(NotifyError::SendFailed("fake failure".to_string()));
            }
            Ok(())
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
pub use fake::FakeNotifyAdapter;

#[cfg(test)]
#[path = "notify_tests.rs"]
mod tests;
