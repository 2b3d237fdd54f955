// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::config::PollPolicy;
use crate::state::JobState;
use hw_adapters::{FakeHostAdapter, FakeNotifyAdapter};
use hw_core::{
    ExecutionGraph, FakeClock, Job, JobId, JobKind, NotificationKind, PlanId, PlanPayload,
    RoutingHint,
};
use hw_wire::RawLogEntry;
use serde_json::json;

// ── PollMachine ─────────────────────────────────────────────────────────

fn policy() -> PollPolicy {
    PollPolicy::for_kind(JobKind::TestCaseRun)
}

fn not_found() -> PollError {
    PollError::NotFound("not found".into())
}

fn transient() -> PollError {
    PollError::Transient { status: 503, message: "busy".into() }
}

#[test]
fn not_found_ceiling_abandons_on_tenth() {
    let mut machine = PollMachine::new(policy(), Instant::now());
    for _ in 0..9 {
        assert!(matches!(machine.on_poll_error(&not_found()), PollDecision::Continue(_)));
    }
    match machine.on_poll_error(&not_found()) {
        PollDecision::GiveUp(SchedulerError::Abandoned { attempts, .. }) => assert_eq!(attempts, 10),
        other => panic!("expected abandon, got {other:?}"),
    }
    assert_eq!(machine.state(), SchedulerState::Finished(SessionOutcome::Abandoned));
}

#[test]
fn transient_ceiling_is_separate_and_lower() {
    let mut machine = PollMachine::new(policy(), Instant::now());
    for _ in 0..4 {
        machine.on_poll_error(&transient());
    }
    machine.on_poll_error(&not_found());
    assert_eq!(machine.consecutive_failures(), 4);
    assert_eq!(machine.consecutive_not_found(), 1);
    assert!(matches!(machine.on_poll_error(&transient()), PollDecision::GiveUp(_)));
}

#[test]
fn any_successful_poll_resets_counters() {
    let mut machine = PollMachine::new(policy(), Instant::now());
    for _ in 0..4 {
        machine.on_poll_error(&transient());
        machine.on_poll_error(&not_found());
    }
    assert!(matches!(machine.on_reconciled(false, None), PollDecision::Continue(_)));
    assert_eq!(machine.consecutive_failures(), 0);
    assert_eq!(machine.consecutive_not_found(), 0);
}

#[test]
fn reconcile_errors_count_as_failures() {
    let mut machine = PollMachine::new(policy(), Instant::now());
    let err = ReconciliationError::LogRegressed { stored: 3, received: 1 };
    for _ in 0..4 {
        machine.on_reconcile_error(&err);
    }
    assert!(matches!(machine.on_reconcile_error(&err), PollDecision::GiveUp(_)));
}

#[test]
fn budget_is_exceeded_only_strictly_past_ceiling() {
    let start = Instant::now();
    let mut machine = PollMachine::new(policy(), start);
    assert!(machine.before_poll(start + Duration::from_secs(300)).is_ok());
    assert_eq!(machine.state(), SchedulerState::Polling);

    let err = machine.before_poll(start + Duration::from_secs(301)).unwrap_err();
    assert_eq!(
        err,
        SchedulerError::TimedOut {
            elapsed: Duration::from_secs(301),
            budget: Duration::from_secs(300)
        }
    );
    assert_eq!(machine.attempts(), 1);
}

#[yare::parameterized(
    completed = { true, SessionOutcome::Completed },
    failed    = { false, SessionOutcome::Failed },
)]
fn terminal_poll_finishes(success: bool, expected: SessionOutcome) {
    let mut machine = PollMachine::new(policy(), Instant::now());
    assert_eq!(machine.on_reconciled(true, Some(success)), PollDecision::Finish(expected));
}

#[test]
fn adaptive_policy_backs_off_on_quiet_polls() {
    let mut machine = PollMachine::new(PollPolicy::for_kind(JobKind::AiTask), Instant::now());
    assert_eq!(machine.on_reconciled(false, None), PollDecision::Continue(Duration::from_secs(2)));
    assert_eq!(machine.on_reconciled(false, None), PollDecision::Continue(Duration::from_secs(4)));
    assert_eq!(machine.on_reconciled(true, None), PollDecision::Continue(Duration::from_secs(1)));
}

// ── PollSession ─────────────────────────────────────────────────────────

fn entries(n: usize) -> Vec<RawLogEntry> {
    (0..n)
        .map(|i| RawLogEntry {
            action_type: "step_started".into(),
            data: json!({"block_id": format!("b{i}")}),
            timestamp_ms: None,
        })
        .collect()
}

fn running(n: usize) -> StatusSnapshot {
    StatusSnapshot {
        success: true,
        status: Some("running".into()),
        is_executing: Some(true),
        execution_log: entries(n),
        ..StatusSnapshot::default()
    }
}

fn completed(n: usize) -> StatusSnapshot {
    let mut snapshot = running(n);
    snapshot.execution_log.push(RawLogEntry {
        action_type: "task_completed".into(),
        data: json!({"duration_ms": 4200}),
        timestamp_ms: None,
    });
    snapshot
}

struct Harness {
    host: FakeHostAdapter,
    notifier: FakeNotifyAdapter,
    clock: FakeClock,
    session: Arc<JobSession>,
}

impl Harness {
    fn new(kind: JobKind) -> Self {
        let clock = FakeClock::new();
        let job = Job::new(JobId::new("J1"), kind, clock.epoch_ms());
        let session = Arc::new(JobSession::new(
            JobState::new(job, ExecutionGraph::default()),
            RoutingHint::new("gw").device("pixel"),
        ));
        Self {
            host: FakeHostAdapter::new(),
            notifier: FakeNotifyAdapter::new(),
            clock,
            session,
        }
    }

    fn poller(&self, policy: PollPolicy) -> PollSession<FakeHostAdapter, FakeNotifyAdapter, FakeClock> {
        PollSession::new(
            self.host.clone(),
            self.notifier.clone(),
            self.clock.clone(),
            policy,
            Arc::clone(&self.session),
            self.clock.now(),
        )
    }

    fn terminal_notifications(&self) -> usize {
        self.notifier.sent().iter().filter(|n| n.kind.is_terminal()).count()
    }
}

#[tokio::test(start_paused = true)]
async fn growing_running_log_keeps_polling_silently() {
    let h = Harness::new(JobKind::TestCaseRun);
    h.host.push_polls([Ok(running(1)), Ok(running(2)), Ok(running(3))]);
    let task = tokio::spawn(h.poller(policy()).run());

    while h.host.poll_count() < 4 {
        tokio::time::sleep(Duration::from_millis(200)).await;
    }

    assert!(!task.is_finished());
    assert_eq!(h.session.outcome(), None);
    assert_eq!(h.terminal_notifications(), 0);
    assert_eq!(h.session.load().log.len(), 3);

    h.session.stop();
    assert_eq!(task.await.unwrap(), SessionOutcome::Stopped);
}

#[tokio::test(start_paused = true)]
async fn eleven_not_found_polls_abandon_after_ten() {
    let h = Harness::new(JobKind::TestCaseRun);
    h.host.push_polls((0..11).map(|_| Err(not_found())));

    let outcome = h.poller(policy()).run().await;

    assert_eq!(outcome, SessionOutcome::Abandoned);
    assert_eq!(h.host.poll_count(), 10);
    assert_eq!(h.session.outcome(), Some(SessionOutcome::Abandoned));
    assert_eq!(h.session.load().job.status, JobStatus::NotFound);
    assert_eq!(h.notifier.count_of(NotificationKind::ExecutionUnavailable), 1);
    assert_eq!(h.terminal_notifications(), 1);
}

#[tokio::test(start_paused = true)]
async fn wall_clock_budget_times_out_once() {
    let h = Harness::new(JobKind::TestCaseRun);
    h.host.push_poll(Ok(running(1)));
    let clock = h.clock.clone();
    h.host.on_poll(move |_| clock.advance_secs(301));

    let outcome = h.poller(policy()).run().await;

    assert_eq!(outcome, SessionOutcome::TimedOut);
    assert_eq!(h.host.poll_count(), 1);
    let state = h.session.load();
    assert_eq!(state.job.status, JobStatus::TimedOut);
    assert!(!state.job.terminal_result.as_ref().unwrap().success);
    let sent = h.notifier.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].key.as_str(), "execution-unavailable-J1");
    assert!(sent[0].message.contains("5m 1s"), "{}", sent[0].message);
}

#[tokio::test(start_paused = true)]
async fn completion_notifies_exactly_once() {
    let h = Harness::new(JobKind::TestCaseRun);
    h.host.push_polls([Ok(running(1)), Ok(running(1)), Ok(completed(2))]);

    let outcome = h.poller(policy()).run().await;

    assert_eq!(outcome, SessionOutcome::Completed);
    assert_eq!(h.host.poll_count(), 3);
    assert_eq!(h.notifier.count_of(NotificationKind::TaskCompleted), 1);
    assert_eq!(h.terminal_notifications(), 1);
    let result = h.session.load().job.terminal_result.clone().unwrap();
    assert!(result.success);
    assert_eq!(result.duration_ms, 4200);
}

#[tokio::test(start_paused = true)]
async fn repeated_plan_notifies_once() {
    let h = Harness::new(JobKind::AiTask);
    let mut planned = running(0);
    planned.plan = Some(PlanPayload {
        plan_id: PlanId::new("p1"),
        analysis: "log in".into(),
        steps: Vec::new(),
    });
    planned.execution_log.push(RawLogEntry {
        action_type: "plan_generated".into(),
        data: json!({"plan_id": "p1"}),
        timestamp_ms: None,
    });
    let mut done = planned.clone();
    done.is_executing = Some(false);
    h.host.push_polls([Ok(planned.clone()), Ok(planned), Ok(done)]);

    let outcome = h.poller(PollPolicy::for_kind(JobKind::AiTask)).run().await;

    assert_eq!(outcome, SessionOutcome::Completed);
    assert_eq!(h.notifier.count_of(NotificationKind::PlanGenerated), 1);
    assert_eq!(h.notifier.count_of(NotificationKind::TaskCompleted), 1);
}

#[tokio::test(start_paused = true)]
async fn interleaved_successes_reset_transient_counter() {
    let h = Harness::new(JobKind::TestCaseRun);
    h.host.push_polls([
        Err(transient()),
        Err(transient()),
        Err(transient()),
        Err(transient()),
        Ok(running(1)),
        Err(PollError::Transport("reset".into())),
        Err(transient()),
        Err(transient()),
        Err(transient()),
        Ok(completed(1)),
    ]);

    assert_eq!(h.poller(policy()).run().await, SessionOutcome::Completed);
    assert_eq!(h.host.poll_count(), 10);
}

#[tokio::test(start_paused = true)]
async fn persistent_transient_errors_abandon() {
    let h = Harness::new(JobKind::TestCaseRun);
    h.host.push_poll(Err(transient()));

    assert_eq!(h.poller(policy()).run().await, SessionOutcome::Abandoned);
    assert_eq!(h.host.poll_count(), 5);
    assert_eq!(h.notifier.count_of(NotificationKind::ExecutionUnavailable), 1);
}

#[tokio::test(start_paused = true)]
async fn malformed_snapshot_keeps_last_good_state() {
    let h = Harness::new(JobKind::TestCaseRun);
    h.host.push_polls([Ok(running(2)), Ok(running(1)), Ok(completed(2))]);

    assert_eq!(h.poller(policy()).run().await, SessionOutcome::Completed);
    assert_eq!(h.session.load().log.len(), 3);
}

#[tokio::test(start_paused = true)]
async fn stop_discards_in_flight_response() {
    let h = Harness::new(JobKind::TestCaseRun);
    h.host.push_poll(Ok(completed(1)));
    h.host.set_poll_delay(Duration::from_secs(10));
    let task = tokio::spawn(h.poller(policy()).run());

    tokio::time::sleep(Duration::from_secs(1)).await;
    assert!(h.session.stop());

    assert_eq!(task.await.unwrap(), SessionOutcome::Stopped);
    assert!(h.session.load().log.is_empty());
    assert!(h.notifier.sent().is_empty());
    assert_eq!(h.host.cancel_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn notification_failures_do_not_change_outcome() {
    let h = Harness::new(JobKind::TestCaseRun);
    h.notifier.set_failing(true);
    h.host.push_poll(Ok(completed(0)));

    assert_eq!(h.poller(policy()).run().await, SessionOutcome::Completed);
    assert_eq!(h.session.load().job.status, JobStatus::Completed);
}

#[tokio::test(start_paused = true)]
async fn routing_hint_is_sent_with_every_poll() {
    let h = Harness::new(JobKind::TestCaseRun);
    h.host.push_polls([Ok(running(0)), Ok(completed(0))]);
    h.poller(policy()).run().await;

    for call in h.host.calls() {
        match call {
            hw_adapters::HostCall::Poll { job_id, routing } => {
                assert_eq!(job_id, "J1");
                assert_eq!(routing.device.as_deref(), Some("pixel"));
            }
            other => panic!("unexpected call {other:?}"),
        }
    }
}
