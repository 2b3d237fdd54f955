// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `hw start` - Start a job and follow it to completion

use super::follow::{ctrl_c, follow};
use super::{parse_kind, Context, HostArgs, SLOT};
use crate::exit_error::{codes, ExitError};
use crate::output::OutputFormat;
use anyhow::Context as _;
use clap::Args;
use hw_adapters::HostAdapter;
use hw_core::{ExecutionGraph, JobId, JobKind};
use hw_engine::JobRequest;
use std::path::{Path, PathBuf};

#[derive(Args, Debug)]
pub struct StartArgs {
    #[command(flatten)]
    pub target: HostArgs,

    /// Job kind: ai_task, test_case_run, exploration_session
    #[arg(long, value_parser = parse_kind)]
    pub kind: JobKind,

    /// Job parameters as a JSON object
    #[arg(long, value_parser = parse_params)]
    pub params: Option<serde_json::Value>,

    /// JSON file with the execution graph (`blocks` and `edges`)
    #[arg(long)]
    pub graph: Option<PathBuf>,

    /// Print the job id and exit instead of following
    #[arg(long)]
    pub detach: bool,
}

fn parse_params(s: &str) -> Result<serde_json::Value, String> {
    match serde_json::from_str(s) {
        Ok(value @ serde_json::Value::Object(_)) => Ok(value),
        Ok(_) => Err("parameters must be a JSON object".to_string()),
        Err(e) => Err(format!("invalid JSON: {e}")),
    }
}

fn load_graph(path: &Path) -> anyhow::Result<ExecutionGraph> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read graph file {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("invalid graph file {}", path.display()))
}

fn start_rejected(e: impl std::fmt::Display) -> anyhow::Error {
    ExitError::new(codes::START_REJECTED, format!("start rejected: {e}")).into()
}

fn print_started(job_id: &JobId, kind: JobKind, format: OutputFormat) {
    match format {
        OutputFormat::Text => println!("Started {kind} job {job_id}"),
        OutputFormat::Json => {
            println!("{}", serde_json::json!({ "job_id": job_id.as_str(), "kind": kind }))
        }
    }
}

pub async fn handle(args: StartArgs, ctx: &Context) -> anyhow::Result<()> {
    let mut request = JobRequest::new(args.kind, args.target.routing());
    if let Some(params) = args.params {
        request = request.parameters(params);
    }
    if let Some(path) = &args.graph {
        request = request.graph(load_graph(path)?);
    }

    if args.detach {
        let job_id = ctx
            .host(&args.target)
            .start(request.kind, request.parameters, &request.routing)
            .await
            .map_err(start_rejected)?;
        print_started(&job_id, args.kind, ctx.format);
        return Ok(());
    }

    let orchestrator = ctx.orchestrator(&args.target);
    let job_id = orchestrator.start_job(SLOT, request).await.map_err(start_rejected)?;
    print_started(&job_id, args.kind, ctx.format);
    follow(&orchestrator, ctx.format, ctrl_c()).await
}

#[cfg(test)]
#[path = "start_tests.rs"]
mod tests;
