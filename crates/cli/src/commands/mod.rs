// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! CLI command implementations

pub mod cancel;
mod follow;
pub mod start;
pub mod validate;
pub mod watch;

use crate::notifier::CliNotifier;
use crate::output::OutputFormat;
use clap::Args;
use hw_adapters::HttpHostAdapter;
use hw_core::{JobKind, RoutingHint, SystemClock};
use hw_engine::{EngineConfig, Orchestrator};

/// The CLI tracks one job per invocation, always in this slot.
pub(crate) const SLOT: &str = "cli";

pub(crate) type CliOrchestrator = Orchestrator<HttpHostAdapter, CliNotifier, SystemClock>;

/// Which host to talk to and how to route within it.
#[derive(Args, Debug, Clone)]
pub struct HostArgs {
    /// Host address (host:port)
    #[arg(long)]
    pub host: String,

    /// Device behind the host
    #[arg(long)]
    pub device: Option<String>,

    /// Control session on the host
    #[arg(long)]
    pub session: Option<String>,
}

impl HostArgs {
    pub fn routing(&self) -> RoutingHint {
        let mut routing = RoutingHint::new(&self.host);
        routing.device = self.device.clone();
        routing.session = self.session.clone();
        routing
    }
}

pub(crate) fn parse_kind(s: &str) -> Result<JobKind, String> {
    s.parse::<JobKind>().map_err(|e| e.to_string())
}

/// Settings shared by every command, resolved once in `main`.
pub struct Context {
    pub config: EngineConfig,
    pub token: Option<String>,
    pub format: OutputFormat,
    pub desktop: bool,
}

impl Context {
    pub fn host(&self, args: &HostArgs) -> HttpHostAdapter {
        let host = HttpHostAdapter::new(&args.host).with_timeout(self.config.request_timeout);
        match &self.token {
            Some(token) => host.with_token(token),
            None => host,
        }
    }

    pub(crate) fn orchestrator(&self, args: &HostArgs) -> CliOrchestrator {
        Orchestrator::new(
            self.host(args),
            CliNotifier::new(self.desktop),
            SystemClock,
            self.config.clone(),
        )
    }
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
