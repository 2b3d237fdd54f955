// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Explicit routing context threaded through every host call.

use serde::{Deserialize, Serialize};

/// Which host (and which device/control session behind it) a call targets.
///
/// Several hosts can sit behind one gateway; dropping the hint lets a stale
/// route answer with another job's state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RoutingHint {
    pub host: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session: Option<String>,
}

impl RoutingHint {
    pub fn new(host: impl Into<String>) -> Self {
        Self { host: host.into(), device: None, session: None }
    }

    crate::setters! {
        option {
            device: String,
            session: String,
        }
    }
}

impl std::fmt::Display for RoutingHint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.host)?;
        if let Some(device) = &self.device {
            write!(f, "/{device}")?;
        }
        Ok(())
    }
}
