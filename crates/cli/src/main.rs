// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! hw: start, follow, cancel, and validate jobs on a remote execution host

mod color;
mod commands;
mod env;
mod exit_error;
mod logging;
mod notifier;
mod output;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use commands::{cancel, start, validate, watch, Context};
use exit_error::ExitError;
use hw_engine::EngineConfig;
use output::OutputFormat;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(
    name = "hw",
    version,
    about = "Track long-running jobs on a remote execution host",
    styles = color::styles(),
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file with per-kind polling policies (TOML) [env: HW_CONFIG]
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory for daily-rolling log files [env: HW_LOG_DIR]
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    /// Bearer token sent to the host [env: HW_TOKEN]
    #[arg(long, global = true)]
    token: Option<String>,

    /// Output format
    #[arg(short = 'o', long = "output", value_enum, default_value_t, global = true)]
    format: OutputFormat,

    /// Also show desktop notifications
    #[arg(long, global = true)]
    desktop: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Start a job and follow it to completion
    Start(start::StartArgs),
    /// Follow a job that is already running
    Watch(watch::WatchArgs),
    /// Ask the host to cancel a job
    Cancel(cancel::CancelArgs),
    /// Validate an exploration session item by item
    Validate(validate::ValidateArgs),
}

fn load_config(path: Option<&Path>) -> anyhow::Result<EngineConfig> {
    let config = match path {
        Some(path) => EngineConfig::load(path)?,
        None => EngineConfig::default(),
    };
    let config = config.with_env_overrides();
    config.validate().context("invalid configuration")?;
    Ok(config)
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config_path = cli.config.or_else(env::config_path).or_else(env::default_config_path);
    let ctx = Context {
        config: load_config(config_path.as_deref())?,
        token: cli.token.or_else(env::token),
        format: cli.format,
        desktop: cli.desktop,
    };
    tracing::debug!(config = ?config_path, "configuration loaded");

    match cli.command {
        Commands::Start(args) => start::handle(args, &ctx).await,
        Commands::Watch(args) => watch::handle(args, &ctx).await,
        Commands::Cancel(args) => cancel::handle(args, &ctx).await,
        Commands::Validate(args) => validate::handle(args, &ctx).await,
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let log_dir = cli.log_dir.clone().or_else(env::log_dir);
    let guard = match logging::init(env::log_filter().as_deref(), log_dir.as_deref()) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("error: cannot set up logging: {e:#}");
            std::process::exit(exit_error::codes::JOB_FAILED);
        }
    };

    let code = match run(cli).await {
        Ok(()) => exit_error::codes::SUCCESS,
        Err(e) => match e.downcast_ref::<ExitError>() {
            Some(exit) => {
                eprintln!("{exit}");
                exit.code
            }
            None => {
                eprintln!("error: {e:#}");
                exit_error::codes::JOB_FAILED
            }
        },
    };
    // Flush buffered file logs before exiting.
    drop(guard);
    std::process::exit(code);
}
