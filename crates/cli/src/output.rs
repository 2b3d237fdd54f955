// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use crate::color;
use clap::ValueEnum;
use hw_core::format_elapsed_ms;
use hw_engine::{JobSnapshot, SessionOutcome, ValidationRecord};
use hw_wire::Progress;

#[derive(Clone, Copy, Debug, Default, PartialEq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// One-line view of a job; printed each time it changes while following.
pub fn status_line(snapshot: &JobSnapshot) -> String {
    let mut line = format!(
        "{} {} {} {:>3}%",
        snapshot.job_id.short(12),
        color::status(snapshot.status),
        color::muted(&snapshot.phase.to_string()),
        snapshot.progress_percentage.round() as u32,
    );
    if let Some(label) = &snapshot.current_step_label {
        line.push_str("  ");
        line.push_str(&color::context(label));
    }
    line
}

/// Closing summary once following ends.
pub fn summary(snapshot: &JobSnapshot, outcome: SessionOutcome) -> String {
    let id = &snapshot.job_id;
    let result = snapshot.terminal_result.as_ref();
    let elapsed = result.map(|r| format_elapsed_ms(r.duration_ms));
    let mut text = match (outcome, elapsed) {
        (SessionOutcome::Completed, Some(d)) => format!("Job {id} completed in {d}"),
        (SessionOutcome::Completed, None) => format!("Job {id} completed"),
        (SessionOutcome::Failed, d) => {
            let mut s = format!("Job {id} failed");
            if let Some(d) = d {
                s.push_str(&format!(" after {d}"));
            }
            if let Some(error) = result.and_then(|r| r.error.as_deref()) {
                s.push_str(&format!(": {error}"));
            }
            s
        }
        (SessionOutcome::TimedOut, _) => format!("Gave up on job {id}: polling budget exhausted"),
        (SessionOutcome::Abandoned, _) => format!("Gave up on job {id}: host no longer reports it"),
        (SessionOutcome::Stopped, _) => format!("Stopped following job {id}"),
    };
    if let Some(url) = result.and_then(|r| r.report_url.as_deref()) {
        text.push_str(&format!("\nReport: {url}"));
    }
    text
}

/// Human-readable line for one validation record.
pub fn record_line(record: &ValidationRecord, progress: Progress) -> String {
    let verdict = if record.success { color::good("ok") } else { color::bad("FAIL") };
    let mut line = format!(
        "[{}/{}] step {} {} ({}) {verdict}",
        progress.current, progress.total, record.step_index, record.label, record.layer
    );
    if let Some(edge) = &record.edge_id {
        line.push_str(&format!(" edge={edge}"));
    }
    if let Some(message) = &record.message {
        line.push_str(&format!(": {message}"));
    }
    line
}

pub fn print_snapshot(snapshot: &JobSnapshot, format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Text => println!("{}", status_line(snapshot)),
        OutputFormat::Json => println!("{}", serde_json::to_string(snapshot)?),
    }
    Ok(())
}

pub fn print_summary(
    snapshot: &JobSnapshot,
    outcome: SessionOutcome,
    format: OutputFormat,
) -> anyhow::Result<()> {
    match format {
        OutputFormat::Text => println!("{}", summary(snapshot, outcome)),
        OutputFormat::Json => {
            let obj = serde_json::json!({ "outcome": outcome, "job": snapshot });
            println!("{}", serde_json::to_string(&obj)?);
        }
    }
    Ok(())
}

pub fn print_records(
    records: &[ValidationRecord],
    progress: Progress,
    format: OutputFormat,
) -> anyhow::Result<()> {
    for record in records {
        match format {
            OutputFormat::Text => println!("{}", record_line(record, progress)),
            OutputFormat::Json => println!("{}", serde_json::to_string(record)?),
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "output_tests.rs"]
mod tests;
