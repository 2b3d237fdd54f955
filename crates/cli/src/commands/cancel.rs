// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `hw cancel` - Ask the host to cancel a job

use super::{Context, HostArgs};
use crate::exit_error::{codes, ExitError};
use crate::output::OutputFormat;
use clap::Args;
use hw_adapters::HostAdapter;
use hw_core::JobId;

#[derive(Args, Debug)]
pub struct CancelArgs {
    /// Job ID on the host
    pub job_id: String,

    #[command(flatten)]
    pub target: HostArgs,
}

pub async fn handle(args: CancelArgs, ctx: &Context) -> anyhow::Result<()> {
    let job_id = JobId::new(args.job_id);
    ctx.host(&args.target).cancel(&job_id, &args.target.routing()).await.map_err(|e| {
        ExitError::new(codes::JOB_FAILED, format!("cancel of {job_id} failed: {e}"))
    })?;
    match ctx.format {
        OutputFormat::Text => println!("Cancelled job {job_id}"),
        OutputFormat::Json => {
            println!("{}", serde_json::json!({ "job_id": job_id.as_str(), "cancelled": true }))
        }
    }
    Ok(())
}
