// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared loop for `start` and `watch`: print changes until the job ends.

use super::SLOT;
use crate::exit_error::ExitError;
use crate::output::{print_snapshot, print_summary, OutputFormat};
use anyhow::anyhow;
use hw_adapters::{HostAdapter, NotifyAdapter};
use hw_core::{Clock, JobPhase, JobStatus};
use hw_engine::{JobSnapshot, Orchestrator};
use std::future::Future;
use std::time::Duration;
use tokio::time::MissedTickBehavior;

const REFRESH: Duration = Duration::from_millis(250);

/// The parts of a snapshot worth a new output line.
#[derive(Debug, PartialEq)]
struct Shown {
    status: JobStatus,
    phase: JobPhase,
    percent: u32,
    label: Option<String>,
}

impl From<&JobSnapshot> for Shown {
    fn from(s: &JobSnapshot) -> Self {
        Self {
            status: s.status,
            phase: s.phase,
            percent: s.progress_percentage.round() as u32,
            label: s.current_step_label.clone(),
        }
    }
}

/// Follow the job in [`SLOT`] until it finishes or `interrupt` resolves.
///
/// Interrupting stops local polling only; the remote job keeps running.
pub(crate) async fn follow<H, N, C>(
    orchestrator: &Orchestrator<H, N, C>,
    format: OutputFormat,
    interrupt: impl Future<Output = ()>,
) -> anyhow::Result<()>
where
    H: HostAdapter,
    N: NotifyAdapter,
    C: Clock,
{
    let session =
        orchestrator.store().get(SLOT).ok_or_else(|| anyhow!("no job is being followed"))?;
    let job_id = session.job_id();

    let mut ticker = tokio::time::interval(REFRESH);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let wait = session.wait();
    tokio::pin!(wait);
    tokio::pin!(interrupt);
    let mut shown: Option<Shown> = None;

    let outcome = loop {
        tokio::select! {
            biased;
            _ = &mut interrupt => {
                orchestrator.stop(SLOT);
                tracing::info!(%job_id, "interrupted, local polling stopped");
                return Err(ExitError::interrupted().into());
            }
            outcome = &mut wait => break outcome,
            _ = ticker.tick() => {
                let snapshot = session.snapshot();
                let next = Shown::from(&snapshot);
                if shown.as_ref() != Some(&next) {
                    print_snapshot(&snapshot, format)?;
                    shown = Some(next);
                }
            }
        }
    };

    let snapshot = session.snapshot();
    print_summary(&snapshot, outcome, format)?;
    let detail = snapshot.terminal_result.as_ref().and_then(|r| r.error.as_deref());
    ExitError::from_outcome(outcome, detail).map_err(Into::into)
}

/// Resolves on Ctrl-C. If the handler cannot be installed, never resolves.
pub(crate) async fn ctrl_c() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "cannot listen for ctrl-c");
        std::future::pending::<()>().await;
    }
}

#[cfg(test)]
#[path = "follow_tests.rs"]
mod tests;
