// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Facade collaborators use to start, stop, and observe jobs.
//!
//! Each logical slot holds at most one session. Starting into an occupied
//! slot stops and evicts what was there.

use crate::config::EngineConfig;
use crate::error::OrchestratorError;
use crate::scheduler::{PollSession, SessionOutcome};
use crate::state::{JobSnapshot, JobState};
use crate::store::{JobSession, JobSessionStore};
use crate::validator::IncrementalValidator;
use hw_adapters::{HostAdapter, NotifyAdapter};
use hw_core::{Clock, ExecutionGraph, Job, JobId, JobKind, RoutingHint, SessionId};
use std::sync::Arc;

/// Everything needed to start (or attach to) one job.
#[derive(Debug, Clone, PartialEq)]
pub struct JobRequest {
    pub kind: JobKind,
    pub parameters: serde_json::Value,
    pub routing: RoutingHint,
    /// Graph shape for test-case runs; empty for other kinds.
    pub graph: ExecutionGraph,
}

impl JobRequest {
    pub fn new(kind: JobKind, routing: RoutingHint) -> Self {
        Self {
            kind,
            parameters: serde_json::Value::Object(Default::default()),
            routing,
            graph: ExecutionGraph::default(),
        }
    }

    hw_core::setters! {
        set {
            parameters: serde_json::Value,
            graph: ExecutionGraph,
        }
    }
}

pub struct Orchestrator<H, N, C> {
    host: H,
    notifier: N,
    clock: C,
    config: EngineConfig,
    store: Arc<JobSessionStore>,
}

impl<H, N, C> Orchestrator<H, N, C>
where
    H: HostAdapter,
    N: NotifyAdapter,
    C: Clock,
{
    pub fn new(host: H, notifier: N, clock: C, config: EngineConfig) -> Self {
        Self { host, notifier, clock, config, store: Arc::new(JobSessionStore::new()) }
    }

    pub fn store(&self) -> &Arc<JobSessionStore> {
        &self.store
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Start a job on the host and begin polling it.
    ///
    /// A rejected start leaves the slot empty; no polling begins.
    pub async fn start_job(
        &self,
        slot: &str,
        request: JobRequest,
    ) -> Result<JobId, OrchestratorError> {
        self.reset(slot);
        let job_id = self
            .host
            .start(request.kind, request.parameters.clone(), &request.routing)
            .await
            .inspect_err(|e| tracing::warn!(slot, kind = %request.kind, error = %e, "start failed"))?;
        tracing::info!(slot, %job_id, kind = %request.kind, "job started");
        self.track(slot, job_id.clone(), request);
        Ok(job_id)
    }

    /// Begin polling a job started elsewhere (e.g. by another client).
    pub fn attach(&self, slot: &str, job_id: JobId, request: JobRequest) {
        self.reset(slot);
        self.track(slot, job_id, request);
    }

    fn track(&self, slot: &str, job_id: JobId, request: JobRequest) {
        let started = self.clock.now();
        let job = Job::new(job_id, request.kind, self.clock.epoch_ms());
        let session = Arc::new(JobSession::new(JobState::new(job, request.graph), request.routing));
        // A concurrent start may have filled the slot since `reset`.
        if let Some(displaced) = self.store.insert(slot, Arc::clone(&session)) {
            displaced.stop();
            tracing::debug!(slot, job_id = %displaced.job_id(), "session displaced");
        }

        let poller = PollSession::new(
            self.host.clone(),
            self.notifier.clone(),
            self.clock.clone(),
            *self.config.policy(request.kind),
            session,
            started,
        );
        tokio::spawn(poller.run());
    }

    /// Stop local polling only. The remote job keeps running.
    pub fn stop(&self, slot: &str) -> bool {
        self.store.get(slot).is_some_and(|s| s.stop())
    }

    /// Best-effort remote cancel, then stop local polling either way.
    pub async fn cancel_remote(&self, slot: &str) -> Result<(), OrchestratorError> {
        let session =
            self.store.get(slot).ok_or_else(|| OrchestratorError::UnknownSlot(slot.to_string()))?;
        let job_id = session.job_id();
        let result = self.host.cancel(&job_id, session.routing()).await;
        session.stop();
        match result {
            Ok(()) => {
                tracing::info!(slot, %job_id, "remote job cancelled");
                Ok(())
            }
            Err(e) => {
                tracing::warn!(slot, %job_id, error = %e, "remote cancel failed");
                Err(e.into())
            }
        }
    }

    /// Stop and evict the slot's session, dropping its dedup set with it.
    pub fn reset(&self, slot: &str) -> bool {
        match self.store.remove(slot) {
            Some(session) => {
                session.stop();
                tracing::debug!(slot, job_id = %session.job_id(), "session evicted");
                true
            }
            None => false,
        }
    }

    pub fn snapshot(&self, slot: &str) -> Option<JobSnapshot> {
        self.store.snapshot(slot)
    }

    pub fn outcome(&self, slot: &str) -> Option<SessionOutcome> {
        self.store.get(slot).and_then(|s| s.outcome())
    }

    pub async fn wait(&self, slot: &str) -> Result<SessionOutcome, OrchestratorError> {
        let session =
            self.store.get(slot).ok_or_else(|| OrchestratorError::UnknownSlot(slot.to_string()))?;
        Ok(session.wait().await)
    }

    pub fn validator(&self, session_id: SessionId, routing: RoutingHint) -> IncrementalValidator<H> {
        IncrementalValidator::new(self.host.clone(), session_id, routing)
    }
}

#[cfg(test)]
#[path = "orchestrator_tests.rs"]
mod tests;
