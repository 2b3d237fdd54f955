// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Where the CLI sends job notifications.

use async_trait::async_trait;
use hw_adapters::{render_body, DesktopNotifyAdapter, NotifyAdapter, NotifyError};
use hw_core::Notification;

/// Console output always; desktop pop-ups only when asked for.
#[derive(Clone, Copy, Debug, Default)]
pub struct CliNotifier {
    desktop: Option<DesktopNotifyAdapter>,
}

impl CliNotifier {
    pub fn new(desktop: bool) -> Self {
        Self { desktop: desktop.then(DesktopNotifyAdapter::new) }
    }
}

pub fn console_line(notification: &Notification) -> String {
    format!("{} {}", crate::color::header(&format!("[{}]", notification.title)), render_body(notification))
}

#[async_trait]
impl NotifyAdapter for CliNotifier {
    async fn notify(&self, notification: &Notification) -> Result<(), NotifyError> {
        eprintln!("{}", console_line(notification));
        if let Some(desktop) = &self.desktop {
            desktop.notify(notification).await?;
        }
        Ok(())
    }
}
