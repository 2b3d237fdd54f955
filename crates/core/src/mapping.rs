// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Learned disambiguation mappings (`user phrase -> resolved node`).

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LearnedMapping {
    pub phrase: String,
    pub node: String,
    #[serde(default = "one")]
    pub usage_count: u32,
}

fn one() -> u32 {
    1
}

/// Append-only table of learned mappings. Entries are never removed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MappingTable {
    entries: Vec<LearnedMapping>,
}

fn normalize(phrase: &str) -> String {
    phrase.trim().to_lowercase()
}

impl MappingTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one use of `phrase -> node`. Returns the new usage count.
    ///
    /// A phrase that already maps somewhere is re-pointed at `node`; its
    /// usage count keeps growing.
    pub fn record(&mut self, phrase: &str, node: &str) -> u32 {
        let key = normalize(phrase);
        if let Some(entry) = self.entries.iter_mut().find(|e| normalize(&e.phrase) == key) {
            entry.node = node.to_string();
            entry.usage_count = entry.usage_count.saturating_add(1);
            return entry.usage_count;
        }
        self.entries.push(LearnedMapping {
            phrase: phrase.trim().to_string(),
            node: node.to_string(),
            usage_count: 1,
        });
        1
    }

    /// Fold a host-reported mapping in, keeping the larger usage count.
    pub fn merge(&mut self, incoming: &LearnedMapping) {
        let key = normalize(&incoming.phrase);
        match self.entries.iter_mut().find(|e| normalize(&e.phrase) == key) {
            Some(entry) if incoming.usage_count >= entry.usage_count => {
                entry.node = incoming.node.clone();
                entry.usage_count = incoming.usage_count;
            }
            Some(_) => {}
            None => self.entries.push(incoming.clone()),
        }
    }

    pub fn resolve(&self, phrase: &str) -> Option<&LearnedMapping> {
        let key = normalize(phrase);
        self.entries.iter().find(|e| normalize(&e.phrase) == key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &LearnedMapping> {
        self.entries.iter()
    }
}

#[cfg(test)]
#[path = "mapping_tests.rs"]
mod tests;
