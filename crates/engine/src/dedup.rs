// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! At-most-once gate for user-facing notifications.
//!
//! Polling is at-least-once from the reconciler's point of view; this set of
//! already-emitted keys turns that into exactly-once delivery. One set per
//! job session, dropped with the session on reset.

use hw_core::IdempotencyKey;
use std::collections::HashSet;

#[derive(Debug, Default)]
pub struct NotificationDeduplicator {
    emitted: HashSet<IdempotencyKey>,
}

impl NotificationDeduplicator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true the first time `key` is seen, false ever after.
    pub fn admit(&mut self, key: &IdempotencyKey) -> bool {
        if self.emitted.contains(key) {
            tracing::debug!(%key, "suppressing duplicate notification");
            return false;
        }
        self.emitted.insert(key.clone())
    }

    pub fn contains(&self, key: &IdempotencyKey) -> bool {
        self.emitted.contains(key)
    }

    pub fn len(&self) -> usize {
        self.emitted.len()
    }

    pub fn is_empty(&self) -> bool {
        self.emitted.is_empty()
    }

    pub fn clear(&mut self) {
        self.emitted.clear();
    }
}
