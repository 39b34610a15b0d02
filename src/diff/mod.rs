//! Diff Engine
//! Compares two consecutive scan snapshots and flags what is newly
//! introduced, with a time-bounded highlight window

use std::collections::{HashMap, HashSet};
use std::time::{Duration, Instant};

use crate::graph::GraphSnapshot;

#[cfg(test)]
mod tests;

/// How long freshly diffed differences stay highlighted.
pub const DIFF_TTL: Duration = Duration::from_secs(5);

/// Stable lookup key for a transition, `"{from}->{to}"`.
pub fn transition_key(from: &str, to: &str) -> String {
    format!("{}->{}", from, to)
}

/// What changed between two snapshots.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiffResult {
    /// Ids of states whose name is absent from the previous snapshot
    pub new_state_ids: HashSet<String>,
    /// Keys of transitions whose (from, to) name pair is new
    pub new_transition_keys: HashSet<String>,
}

impl DiffResult {
    pub fn is_empty(&self) -> bool {
        self.new_state_ids.is_empty() && self.new_transition_keys.is_empty()
    }
}

/// Diff `next` against `prev`.
///
/// States are compared by name, transitions by their raw (from, to) name
/// pair. A transition whose endpoints are unchanged but whose `rule` text
/// differs is NOT flagged; the diff only tracks pair existence.
pub fn diff_snapshots(prev: &GraphSnapshot, next: &GraphSnapshot) -> DiffResult {
    let prev_names: HashSet<&str> = prev.states.iter().map(|s| s.label.as_str()).collect();

    let new_state_ids = next
        .states
        .iter()
        .filter(|s| !prev_names.contains(s.label.as_str()))
        .map(|s| s.id.clone())
        .collect();

    let prev_pairs = name_pairs(prev);
    let next_names = label_index(next);
    let new_transition_keys = next
        .transitions
        .iter()
        .filter(|t| !prev_pairs.contains(&name_pair(&next_names, &t.from, &t.to)))
        .map(|t| transition_key(&t.from, &t.to))
        .collect();

    DiffResult {
        new_state_ids,
        new_transition_keys,
    }
}

fn label_index(snapshot: &GraphSnapshot) -> HashMap<&str, &str> {
    snapshot
        .states
        .iter()
        .map(|s| (s.id.as_str(), s.label.as_str()))
        .collect()
}

fn name_pairs(snapshot: &GraphSnapshot) -> HashSet<(String, String)> {
    let names = label_index(snapshot);
    snapshot
        .transitions
        .iter()
        .map(|t| name_pair(&names, &t.from, &t.to))
        .collect()
}

// Dangling endpoints keep their raw id so they still compare stably.
fn name_pair(names: &HashMap<&str, &str>, from: &str, to: &str) -> (String, String) {
    (
        names.get(from).copied().unwrap_or(from).to_string(),
        names.get(to).copied().unwrap_or(to).to_string(),
    )
}

/// A computed diff plus the moment it was computed.
///
/// Expiry is checked against a caller-supplied `Instant`, so the host owns
/// the actual timer and tests can advance virtual time deterministically.
/// A new scan replaces the whole window rather than extending it.
#[derive(Debug, Clone)]
pub struct DiffWindow {
    pub result: DiffResult,
    started: Instant,
}

impl DiffWindow {
    pub fn new(result: DiffResult, started: Instant) -> Self {
        Self { result, started }
    }

    pub fn expired(&self, now: Instant) -> bool {
        now.duration_since(self.started) >= DIFF_TTL
    }
}
