// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Process-local holder for concurrently tracked job sessions.
//!
//! Single writer (the session's polling task), many readers. Readers get an
//! `Arc<JobState>` or an owned [`JobSnapshot`]; the writer swaps in a whole
//! new state per reconciliation pass.

use crate::scheduler::SessionOutcome;
use crate::state::{JobSnapshot, JobState};
use hw_core::{JobId, RoutingHint};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

/// One tracked job: its current state, routing, and stop handle.
pub struct JobSession {
    state: RwLock<Arc<JobState>>,
    routing: RoutingHint,
    cancel: CancellationToken,
    outcome: watch::Sender<Option<SessionOutcome>>,
}

impl JobSession {
    pub fn new(state: JobState, routing: RoutingHint) -> Self {
        let (outcome, _) = watch::channel(None);
        Self {
            state: RwLock::new(Arc::new(state)),
            routing,
            cancel: CancellationToken::new(),
            outcome,
        }
    }

    pub fn load(&self) -> Arc<JobState> {
        self.state.read().clone()
    }

    pub fn snapshot(&self) -> JobSnapshot {
        self.load().snapshot()
    }

    pub fn job_id(&self) -> JobId {
        self.load().job.id.clone()
    }

    pub fn routing(&self) -> &RoutingHint {
        &self.routing
    }

    pub(crate) fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn is_stopped(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Swap in a new state. Discarded (returns false) once stopped.
    pub(crate) fn publish(&self, state: JobState) -> bool {
        let mut current = self.state.write();
        if self.cancel.is_cancelled() {
            return false;
        }
        *current = Arc::new(state);
        true
    }

    /// Stop local polling. Idempotent; true only for the call that stopped a
    /// still-running session.
    pub fn stop(&self) -> bool {
        {
            // Cancel under the state lock so no publish can land afterwards
            let _guard = self.state.write();
            if self.cancel.is_cancelled() {
                return false;
            }
            self.cancel.cancel();
        }
        self.finish(SessionOutcome::Stopped)
    }

    /// Record the terminal outcome. The first outcome wins.
    pub(crate) fn finish(&self, outcome: SessionOutcome) -> bool {
        self.outcome.send_if_modified(|current| {
            if current.is_some() {
                return false;
            }
            *current = Some(outcome);
            true
        })
    }

    pub fn outcome(&self) -> Option<SessionOutcome> {
        *self.outcome.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<SessionOutcome>> {
        self.outcome.subscribe()
    }

    /// Wait for the terminal outcome.
    pub async fn wait(&self) -> SessionOutcome {
        let mut rx = self.subscribe();
        let outcome = rx.wait_for(Option::is_some).await.ok().and_then(|o| *o);
        outcome.unwrap_or(SessionOutcome::Stopped)
    }
}

/// Sessions keyed by logical slot (e.g. "monitor", "test-run").
#[derive(Default)]
pub struct JobSessionStore {
    sessions: RwLock<HashMap<String, Arc<JobSession>>>,
}

impl JobSessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert into `slot`, returning the session it displaced.
    pub fn insert(&self, slot: &str, session: Arc<JobSession>) -> Option<Arc<JobSession>> {
        self.sessions.write().insert(slot.to_string(), session)
    }

    pub fn get(&self, slot: &str) -> Option<Arc<JobSession>> {
        self.sessions.read().get(slot).cloned()
    }

    pub fn remove(&self, slot: &str) -> Option<Arc<JobSession>> {
        self.sessions.write().remove(slot)
    }

    pub fn snapshot(&self, slot: &str) -> Option<JobSnapshot> {
        self.get(slot).map(|s| s.snapshot())
    }

    pub fn slots(&self) -> Vec<String> {
        let mut slots: Vec<String> = self.sessions.read().keys().cloned().collect();
        slots.sort();
        slots
    }

    pub fn len(&self) -> usize {
        self.sessions.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.read().is_empty()
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
