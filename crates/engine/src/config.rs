// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Polling policy per job kind.
//!
//! Precedence, lowest first: built-in defaults, the optional TOML file,
//! then `HW_*` environment overrides (see [`crate::env`]).
//!
//! ```toml
//! request_timeout_ms = 10000
//!
//! [poll.exploration_session]
//! interval_ms = 5000
//! max_duration_ms = 300000
//! ```

use hw_core::JobKind;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

const DEFAULT_MAX_DURATION: Duration = Duration::from_secs(300);
const DEFAULT_MAX_FAILURES: u32 = 5;
const DEFAULT_MAX_NOT_FOUND: u32 = 10;
const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Back-off for kinds whose progress arrives in bursts.
///
/// The interval doubles (by `factor`) after each poll that changed nothing,
/// up to `max`, and snaps back to the base interval on any change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdaptiveInterval {
    pub max: Duration,
    pub factor: u32,
}

impl AdaptiveInterval {
    pub fn next(&self, base: Duration, current: Duration, changed: bool) -> Duration {
        if changed {
            return base;
        }
        current.saturating_mul(self.factor.max(1)).min(self.max.max(base))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    pub interval: Duration,
    /// Wall-clock ceiling measured from job start.
    pub max_duration: Duration,
    pub max_consecutive_failures: u32,
    pub max_not_found: u32,
    pub adaptive: Option<AdaptiveInterval>,
}

impl PollPolicy {
    pub fn for_kind(kind: JobKind) -> Self {
        let base = Self {
            interval: Duration::from_secs(1),
            max_duration: DEFAULT_MAX_DURATION,
            max_consecutive_failures: DEFAULT_MAX_FAILURES,
            max_not_found: DEFAULT_MAX_NOT_FOUND,
            adaptive: None,
        };
        match kind {
            JobKind::TestCaseRun => base,
            JobKind::ExplorationSession => Self { interval: Duration::from_secs(5), ..base },
            JobKind::AiTask => Self {
                adaptive: Some(AdaptiveInterval { max: Duration::from_secs(5), factor: 2 }),
                ..base
            },
        }
    }

    /// Interval to sleep after a poll, given the interval used before it.
    pub fn next_interval(&self, current: Duration, changed: bool) -> Duration {
        match &self.adaptive {
            Some(adaptive) => adaptive.next(self.interval, current, changed),
            None => self.interval,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    pub ai_task: PollPolicy,
    pub test_case_run: PollPolicy,
    pub exploration_session: PollPolicy,
    pub request_timeout: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            ai_task: PollPolicy::for_kind(JobKind::AiTask),
            test_case_run: PollPolicy::for_kind(JobKind::TestCaseRun),
            exploration_session: PollPolicy::for_kind(JobKind::ExplorationSession),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    request_timeout_ms: Option<u64>,
    #[serde(default)]
    poll: RawPollTables,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawPollTables {
    ai_task: Option<RawPolicy>,
    test_case_run: Option<RawPolicy>,
    exploration_session: Option<RawPolicy>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawPolicy {
    interval_ms: Option<u64>,
    max_duration_ms: Option<u64>,
    max_consecutive_failures: Option<u32>,
    max_not_found: Option<u32>,
    /// `false` turns adaptive back-off off; `adaptive_max_ms` turns it on.
    adaptive: Option<bool>,
    adaptive_max_ms: Option<u64>,
}

impl RawPolicy {
    fn apply(&self, policy: &mut PollPolicy) {
        if let Some(ms) = self.interval_ms {
            policy.interval = Duration::from_millis(ms);
        }
        if let Some(ms) = self.max_duration_ms {
            policy.max_duration = Duration::from_millis(ms);
        }
        if let Some(n) = self.max_consecutive_failures {
            policy.max_consecutive_failures = n;
        }
        if let Some(n) = self.max_not_found {
            policy.max_not_found = n;
        }
        if let Some(ms) = self.adaptive_max_ms {
            let factor = policy.adaptive.map(|a| a.factor).unwrap_or(2);
            policy.adaptive = Some(AdaptiveInterval { max: Duration::from_millis(ms), factor });
        }
        if self.adaptive == Some(false) {
            policy.adaptive = None;
        }
    }
}

impl EngineConfig {
    pub fn policy(&self, kind: JobKind) -> &PollPolicy {
        match kind {
            JobKind::AiTask => &self.ai_task,
            JobKind::TestCaseRun => &self.test_case_run,
            JobKind::ExplorationSession => &self.exploration_session,
        }
    }

    fn policy_mut(&mut self, kind: JobKind) -> &mut PollPolicy {
        match kind {
            JobKind::AiTask => &mut self.ai_task,
            JobKind::TestCaseRun => &mut self.test_case_run,
            JobKind::ExplorationSession => &mut self.exploration_session,
        }
    }

    /// Overlay a TOML document onto the defaults.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let raw: RawConfig = toml::from_str(text)?;
        let mut config = Self::default();
        if let Some(ms) = raw.request_timeout_ms {
            config.request_timeout = Duration::from_millis(ms);
        }
        let tables = [
            (JobKind::AiTask, &raw.poll.ai_task),
            (JobKind::TestCaseRun, &raw.poll.test_case_run),
            (JobKind::ExplorationSession, &raw.poll.exploration_session),
        ];
        for (kind, table) in tables {
            if let Some(table) = table {
                table.apply(config.policy_mut(kind));
            }
        }
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)
            .map_err(|source| ConfigError::Io { path: path.to_path_buf(), source })?;
        Self::from_toml_str(&text)
    }

    /// Apply `HW_*` environment overrides to every kind.
    pub fn with_env_overrides(mut self) -> Self {
        for kind in JobKind::ALL {
            let policy = self.policy_mut(kind);
            if let Some(interval) = crate::env::poll_interval() {
                policy.interval = interval;
            }
            if let Some(budget) = crate::env::max_duration() {
                policy.max_duration = budget;
            }
            if let Some(n) = crate::env::max_failures() {
                policy.max_consecutive_failures = n;
            }
            if let Some(n) = crate::env::max_not_found() {
                policy.max_not_found = n;
            }
        }
        if let Some(timeout) = crate::env::request_timeout() {
            self.request_timeout = timeout;
        }
        self
    }

    /// Reject zero-valued intervals or ceilings.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for kind in JobKind::ALL {
            let policy = self.policy(kind);
            if policy.interval.is_zero() {
                return Err(ConfigError::Invalid(format!("{kind}: interval_ms must be > 0")));
            }
            if policy.max_not_found == 0 || policy.max_consecutive_failures == 0 {
                return Err(ConfigError::Invalid(format!("{kind}: ceilings must be > 0")));
            }
        }
        if self.request_timeout.is_zero() {
            return Err(ConfigError::Invalid("request_timeout_ms must be > 0".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
