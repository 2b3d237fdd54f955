// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `hw watch` - Follow a job started elsewhere

use super::follow::{ctrl_c, follow};
use super::{parse_kind, Context, HostArgs, SLOT};
use clap::Args;
use hw_core::{JobId, JobKind};
use hw_engine::JobRequest;

#[derive(Args, Debug)]
pub struct WatchArgs {
    /// Job ID on the host
    pub job_id: String,

    #[command(flatten)]
    pub target: HostArgs,

    /// Job kind: ai_task, test_case_run, exploration_session
    #[arg(long, value_parser = parse_kind)]
    pub kind: JobKind,
}

pub async fn handle(args: WatchArgs, ctx: &Context) -> anyhow::Result<()> {
    let orchestrator = ctx.orchestrator(&args.target);
    let request = JobRequest::new(args.kind, args.target.routing());
    orchestrator.attach(SLOT, JobId::new(args.job_id), request);
    follow(&orchestrator, ctx.format, ctrl_c()).await
}
