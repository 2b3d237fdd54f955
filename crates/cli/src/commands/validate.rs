// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `hw validate` - Validate an exploration session item by item

use super::follow::ctrl_c;
use super::{Context, HostArgs};
use crate::exit_error::{codes, ExitError};
use crate::output::{print_records, OutputFormat};
use clap::Args;
use hw_adapters::HostAdapter;
use hw_core::{JobKind, SessionId};
use hw_engine::{IncrementalValidator, PollPolicy, ValidatorError};
use std::future::Future;

#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Validation session ID on the host
    pub session_id: String,

    #[command(flatten)]
    pub target: HostArgs,
}

pub async fn handle(args: ValidateArgs, ctx: &Context) -> anyhow::Result<()> {
    let policy = *ctx.config.policy(JobKind::ExplorationSession);
    let mut validator = IncrementalValidator::new(
        ctx.host(&args.target),
        SessionId::new(args.session_id),
        args.target.routing(),
    );
    drive(&mut validator, &policy, ctx.format, ctrl_c()).await
}

/// Validate items until the host reports none left.
///
/// A failed item is retried after `policy.interval`, up to
/// `policy.max_consecutive_failures` times in a row.
pub(crate) async fn drive<H: HostAdapter>(
    validator: &mut IncrementalValidator<H>,
    policy: &PollPolicy,
    format: OutputFormat,
    interrupt: impl Future<Output = ()>,
) -> anyhow::Result<()> {
    tokio::pin!(interrupt);
    let mut failures = 0u32;

    while !validator.is_finished() {
        let result = tokio::select! {
            biased;
            _ = &mut interrupt => return Err(ExitError::interrupted().into()),
            result = validator.validate_next() => result,
        };
        match result {
            Ok(step) => {
                failures = 0;
                print_records(&step.records, step.progress, format)?;
            }
            Err(ValidatorError::Finished) => break,
            Err(ValidatorError::SessionLost(message)) => {
                return Err(ExitError::new(
                    codes::NOT_FOUND,
                    format!("validation session lost: {message}"),
                )
                .into());
            }
            Err(e @ ValidatorError::Host(_)) => {
                failures += 1;
                if failures >= policy.max_consecutive_failures {
                    return Err(
                        ExitError::new(codes::JOB_FAILED, format!("validation stalled: {e}")).into()
                    );
                }
                tracing::warn!(attempt = failures, error = %e, "validation item failed, retrying");
                tokio::select! {
                    biased;
                    _ = &mut interrupt => return Err(ExitError::interrupted().into()),
                    _ = tokio::time::sleep(policy.interval) => {}
                }
            }
        }
    }

    let total = validator.records().len();
    let failed = validator.records().iter().filter(|r| !r.success).count();
    match format {
        OutputFormat::Text => println!("Validated {total} records, {failed} failed"),
        OutputFormat::Json => println!(
            "{}",
            serde_json::json!({
                "records": total,
                "failed": failed,
                "progress": validator.progress(),
            })
        ),
    }
    if failed > 0 {
        return Err(ExitError::new(codes::JOB_FAILED, format!("{failed} records failed")).into());
    }
    Ok(())
}

#[cfg(test)]
#[path = "validate_tests.rs"]
mod tests;
