// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Scripted host for engine tests.
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{CancelError, HostAdapter, PollError, StartError, ValidateError};
use async_trait::async_trait;
use hw_core::{JobId, JobKind, RoutingHint, SessionId};
use hw_wire::{StatusSnapshot, ValidateNextResponse};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

/// Recorded host call
#[derive(Debug, Clone, PartialEq)]
pub enum HostCall {
    Start { kind: JobKind, parameters: serde_json::Value, routing: RoutingHint },
    Poll { job_id: JobId, routing: RoutingHint },
    Cancel { job_id: JobId, routing: RoutingHint },
    ValidateNext { session_id: SessionId, routing: RoutingHint },
}

type PollHook = Arc<dyn Fn(usize) + Send + Sync>;

struct FakeHostState {
    calls: Vec<HostCall>,
    starts: VecDeque<Result<JobId, StartError>>,
    polls: VecDeque<Result<StatusSnapshot, PollError>>,
    last_poll: Option<Result<StatusSnapshot, PollError>>,
    poll_count: usize,
    cancels: VecDeque<Result<(), CancelError>>,
    validations: VecDeque<Result<ValidateNextResponse, ValidateError>>,
    start_delay: Option<Duration>,
    poll_delay: Option<Duration>,
    on_poll: Option<PollHook>,
}

/// Fake host adapter.
///
/// Poll results are consumed in order; once the script runs out the last
/// result repeats, so a test can script "three running snapshots then
/// completed" and let the loop settle.
#[derive(Clone)]
pub struct FakeHostAdapter {
    inner: Arc<Mutex<FakeHostState>>,
}

impl Default for FakeHostAdapter {
    fn default() -> Self {
        Self {
            inner: Arc::new(Mutex::new(FakeHostState {
                calls: Vec::new(),
                starts: VecDeque::new(),
                polls: VecDeque::new(),
                last_poll: None,
                poll_count: 0,
                cancels: VecDeque::new(),
                validations: VecDeque::new(),
                start_delay: None,
                poll_delay: None,
                on_poll: None,
            })),
        }
    }
}

impl FakeHostAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_start(&self, result: Result<JobId, StartError>) {
        self.inner.lock().starts.push_back(result);
    }

    pub fn push_poll(&self, result: Result<StatusSnapshot, PollError>) {
        self.inner.lock().polls.push_back(result);
    }

    pub fn push_polls(&self, results: impl IntoIterator<Item = Result<StatusSnapshot, PollError>>) {
        self.inner.lock().polls.extend(results);
    }

    pub fn push_cancel(&self, result: Result<(), CancelError>) {
        self.inner.lock().cancels.push_back(result);
    }

    pub fn push_validation(&self, result: Result<ValidateNextResponse, ValidateError>) {
        self.inner.lock().validations.push_back(result);
    }

    /// Sleep (tokio time) before answering each start.
    pub fn set_start_delay(&self, delay: Duration) {
        self.inner.lock().start_delay = Some(delay);
    }

    /// Sleep (tokio time) before answering each poll.
    pub fn set_poll_delay(&self, delay: Duration) {
        self.inner.lock().poll_delay = Some(delay);
    }

    /// Called with the 1-based poll count before each poll answers.
    /// Tests use it to advance a `FakeClock` in lockstep with polling.
    pub fn on_poll(&self, hook: impl Fn(usize) + Send + Sync + 'static) {
        self.inner.lock().on_poll = Some(Arc::new(hook));
    }

    pub fn calls(&self) -> Vec<HostCall> {
        self.inner.lock().calls.clone()
    }

    pub fn poll_count(&self) -> usize {
        self.inner.lock().poll_count
    }

    pub fn cancel_count(&self) -> usize {
        self.inner.lock().calls.iter().filter(|c| matches!(c, HostCall::Cancel { .. })).count()
    }
}

#[async_trait]
impl HostAdapter for FakeHostAdapter {
    async fn start(
        &self,
        kind: JobKind,
        parameters: serde_json::Value,
        routing: &RoutingHint,
    ) -> Result<JobId, StartError> {
        let (result, delay) = {
            let mut inner = self.inner.lock();
            inner.calls.push(HostCall::Start { kind, parameters, routing: routing.clone() });
            let n = inner.calls.len();
            let result =
                inner.starts.pop_front().unwrap_or_else(|| Ok(JobId::new(format!("job-{n}"))));
            (result, inner.start_delay)
        };
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        result
    }

    async fn poll(
        &self,
        job_id: &JobId,
        routing: &RoutingHint,
    ) -> Result<StatusSnapshot, PollError> {
        let (delay, hook, count) = {
            let mut inner = self.inner.lock();
            inner
                .calls
                .push(HostCall::Poll { job_id: job_id.clone(), routing: routing.clone() });
            inner.poll_count += 1;
            (inner.poll_delay, inner.on_poll.clone(), inner.poll_count)
        };
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if let Some(hook) = hook {
            hook(count);
        }
        let mut inner = self.inner.lock();
        match inner.polls.pop_front() {
            Some(result) => {
                inner.last_poll = Some(result.clone());
                result
            }
            None => inner
                .last_poll
                .clone()
                .unwrap_or_else(|| Err(PollError::NotFound(format!("no script for {job_id}")))),
        }
    }

    async fn cancel(&self, job_id: &JobId, routing: &RoutingHint) -> Result<(), CancelError> {
        let mut inner = self.inner.lock();
        inner.calls.push(HostCall::Cancel { job_id: job_id.clone(), routing: routing.clone() });
        inner.cancels.pop_front().unwrap_or(Ok(()))
    }

    async fn validate_next(
        &self,
        session_id: &SessionId,
        routing: &RoutingHint,
    ) -> Result<ValidateNextResponse, ValidateError> {
        let mut inner = self.inner.lock();
        inner.calls.push(HostCall::ValidateNext {
            session_id: session_id.clone(),
            routing: routing.clone(),
        });
        inner
            .validations
            .pop_front()
            .unwrap_or_else(|| Err(ValidateError::NotFound(session_id.to_string())))
    }
}
