// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Polling scheduler: one cancellable task per tracked job.
//!
//! [`PollMachine`] holds the ceilings and counters and decides what happens
//! after each poll; [`PollSession::run`] owns the timer, the host calls, and
//! the cancellation token. Poll N+1 is never issued before poll N has been
//! reconciled and published.

use crate::config::PollPolicy;
use crate::dedup::NotificationDeduplicator;
use crate::error::{ReconciliationError, SchedulerError};
use crate::notification;
use crate::reconcile::reconcile;
use crate::store::JobSession;
use hw_adapters::{HostAdapter, NotifyAdapter, PollError};
use hw_core::{format_elapsed, Clock, JobStatus, Notification, TerminalResult};
use hw_wire::StatusSnapshot;
use serde::Serialize;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// How a tracked session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionOutcome {
    Completed,
    Failed,
    TimedOut,
    Abandoned,
    /// Local polling was stopped by the caller; the remote job may still run.
    Stopped,
}

hw_core::simple_display! {
    SessionOutcome {
        Completed => "completed",
        Failed => "failed",
        TimedOut => "timed_out",
        Abandoned => "abandoned",
        Stopped => "stopped",
    }
}

impl SessionOutcome {
    pub fn is_success(self) -> bool {
        self == SessionOutcome::Completed
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    Starting,
    Polling,
    Finished(SessionOutcome),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollDecision {
    /// Sleep this long, then poll again.
    Continue(Duration),
    Finish(SessionOutcome),
    GiveUp(SchedulerError),
}

/// Counters and ceilings for one job. No I/O.
#[derive(Debug, Clone)]
pub struct PollMachine {
    policy: PollPolicy,
    started: Instant,
    state: SchedulerState,
    attempts: u32,
    consecutive_failures: u32,
    consecutive_not_found: u32,
    interval: Duration,
}

impl PollMachine {
    pub fn new(policy: PollPolicy, started: Instant) -> Self {
        Self {
            policy,
            started,
            state: SchedulerState::Starting,
            attempts: 0,
            consecutive_failures: 0,
            consecutive_not_found: 0,
            interval: policy.interval,
        }
    }

    pub fn state(&self) -> SchedulerState {
        self.state
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn consecutive_failures(&self) -> u32 {
        self.consecutive_failures
    }

    pub fn consecutive_not_found(&self) -> u32 {
        self.consecutive_not_found
    }

    /// Budget check ahead of each poll; the budget runs from job start.
    pub fn before_poll(&mut self, now: Instant) -> Result<(), SchedulerError> {
        let elapsed = now.saturating_duration_since(self.started);
        if elapsed > self.policy.max_duration {
            self.state = SchedulerState::Finished(SessionOutcome::TimedOut);
            return Err(SchedulerError::TimedOut { elapsed, budget: self.policy.max_duration });
        }
        self.state = SchedulerState::Polling;
        self.attempts += 1;
        Ok(())
    }

    /// A poll that was reconciled. `terminal` carries the job's success flag
    /// once it has finished.
    pub fn on_reconciled(&mut self, changed: bool, terminal: Option<bool>) -> PollDecision {
        self.consecutive_failures = 0;
        self.consecutive_not_found = 0;
        if let Some(success) = terminal {
            let outcome = if success { SessionOutcome::Completed } else { SessionOutcome::Failed };
            self.state = SchedulerState::Finished(outcome);
            return PollDecision::Finish(outcome);
        }
        self.interval = self.policy.next_interval(self.interval, changed);
        PollDecision::Continue(self.interval)
    }

    pub fn on_poll_error(&mut self, err: &PollError) -> PollDecision {
        match err {
            PollError::NotFound(_) => {
                self.consecutive_not_found += 1;
                if self.consecutive_not_found >= self.policy.max_not_found {
                    return self.abandon(self.consecutive_not_found, err.to_string());
                }
            }
            PollError::Transient { .. } | PollError::Transport(_) | PollError::Malformed(_) => {
                return self.count_failure(err.to_string());
            }
        }
        PollDecision::Continue(self.interval)
    }

    /// A snapshot that arrived but could not be merged counts as a failure.
    pub fn on_reconcile_error(&mut self, err: &ReconciliationError) -> PollDecision {
        self.count_failure(err.to_string())
    }

    fn count_failure(&mut self, message: String) -> PollDecision {
        self.consecutive_failures += 1;
        if self.consecutive_failures >= self.policy.max_consecutive_failures {
            return self.abandon(self.consecutive_failures, message);
        }
        PollDecision::Continue(self.interval)
    }

    fn abandon(&mut self, attempts: u32, last_error: String) -> PollDecision {
        self.state = SchedulerState::Finished(SessionOutcome::Abandoned);
        PollDecision::GiveUp(SchedulerError::Abandoned { attempts, last_error })
    }
}

/// The polling task for one session.
pub(crate) struct PollSession<H, N, C> {
    host: H,
    notifier: N,
    clock: C,
    policy: PollPolicy,
    session: Arc<JobSession>,
    started: Instant,
    dedup: NotificationDeduplicator,
}

impl<H, N, C> PollSession<H, N, C>
where
    H: HostAdapter,
    N: NotifyAdapter,
    C: Clock,
{
    pub(crate) fn new(
        host: H,
        notifier: N,
        clock: C,
        policy: PollPolicy,
        session: Arc<JobSession>,
        started: Instant,
    ) -> Self {
        Self { host, notifier, clock, policy, session, started, dedup: NotificationDeduplicator::new() }
    }

    pub(crate) async fn run(mut self) -> SessionOutcome {
        let cancel = self.session.cancel_token();
        let routing = self.session.routing().clone();
        let job_id = self.session.job_id();
        let kind = self.session.load().job.kind;
        let mut machine = PollMachine::new(self.policy, self.started);
        tracing::info!(%job_id, %kind, %routing, "polling started");

        loop {
            if let Err(err) = machine.before_poll(self.clock.now()) {
                return self.give_up(err).await;
            }
            tracing::debug!(%job_id, attempt = machine.attempts(), "polling");

            let result = tokio::select! {
                biased;
                _ = cancel.cancelled() => return self.stopped(),
                result = self.host.poll(&job_id, &routing) => result,
            };
            if cancel.is_cancelled() {
                return self.stopped();
            }

            let decision = match result {
                Ok(snapshot) => self.apply(&mut machine, &snapshot).await,
                Err(err) => {
                    tracing::warn!(%job_id, attempt = machine.attempts(), error = %err, "poll failed");
                    machine.on_poll_error(&err)
                }
            };

            let wait = match decision {
                PollDecision::Continue(wait) => wait,
                PollDecision::Finish(outcome) => {
                    self.session.finish(outcome);
                    let elapsed_ms = self.clock.elapsed_since(self.started).as_millis() as u64;
                    tracing::info!(%job_id, %outcome, elapsed_ms, "job finished");
                    return self.session.outcome().unwrap_or(outcome);
                }
                PollDecision::GiveUp(err) => return self.give_up(err).await,
            };

            tokio::select! {
                biased;
                _ = cancel.cancelled() => return self.stopped(),
                _ = tokio::time::sleep(wait) => {}
            }
        }
    }

    async fn apply(&mut self, machine: &mut PollMachine, snapshot: &StatusSnapshot) -> PollDecision {
        let prev = self.session.load();
        let reconciled = match reconcile(&prev, snapshot, self.clock.epoch_ms()) {
            Ok(reconciled) => reconciled,
            Err(err) => {
                tracing::warn!(job_id = %prev.job.id, error = %err, "skipping snapshot");
                return machine.on_reconcile_error(&err);
            }
        };

        let terminal = reconciled
            .state
            .job
            .is_terminal()
            .then(|| reconciled.state.job.terminal_result.as_ref().is_some_and(|r| r.success));
        let notices: Vec<Notification> = reconciled
            .events
            .iter()
            .map(|event| notification::for_event(event, &reconciled.state))
            .collect();
        if reconciled.changed {
            tracing::debug!(
                job_id = %reconciled.state.job.id,
                status = %reconciled.state.job.status,
                new_entries = reconciled.new_entries.len(),
                transitions = reconciled.transitions.len(),
                "reconciled"
            );
        }
        if !self.session.publish(reconciled.state) {
            return PollDecision::Finish(SessionOutcome::Stopped);
        }
        for notice in notices {
            self.deliver(notice).await;
        }
        machine.on_reconciled(reconciled.changed, terminal)
    }

    async fn deliver(&mut self, notice: Notification) {
        if !self.dedup.admit(&notice.key) {
            return;
        }
        if let Err(e) = self.notifier.notify(&notice).await {
            tracing::warn!(key = %notice.key, error = %e, "notification delivery failed");
        }
    }

    /// Timeout or failure ceiling: mark the job terminal and say so once.
    async fn give_up(&mut self, err: SchedulerError) -> SessionOutcome {
        let elapsed = self.clock.elapsed_since(self.started);
        let (outcome, status, reason) = match &err {
            SchedulerError::TimedOut { budget, .. } => (
                SessionOutcome::TimedOut,
                JobStatus::TimedOut,
                format!(
                    "no result after {} (limit {})",
                    format_elapsed(elapsed.as_secs()),
                    format_elapsed(budget.as_secs())
                ),
            ),
            SchedulerError::Abandoned { attempts, last_error } => (
                SessionOutcome::Abandoned,
                JobStatus::NotFound,
                format!("host unreachable or job lost after {attempts} failed polls ({last_error})"),
            ),
        };
        let mut state = (*self.session.load()).clone();
        tracing::warn!(job_id = %state.job.id, %outcome, error = %err, "giving up on job");

        state.job.status = status;
        state.job.terminal_result = Some(
            TerminalResult::new(false, elapsed.as_millis() as u64).error(err.to_string()),
        );
        let notice = notification::execution_unavailable(&state, &reason);
        if !self.session.publish(state) {
            return self.stopped();
        }
        self.deliver(notice).await;
        self.session.finish(outcome);
        self.session.outcome().unwrap_or(outcome)
    }

    fn stopped(&self) -> SessionOutcome {
        tracing::info!(job_id = %self.session.job_id(), "polling stopped");
        self.session.finish(SessionOutcome::Stopped);
        self.session.outcome().unwrap_or(SessionOutcome::Stopped)
    }
}

#[cfg(test)]
#[path = "scheduler_tests.rs"]
mod tests;
