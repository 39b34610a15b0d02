//! Graph Model
//! Canonical representation of states and transitions, built from an
//! external scan payload or from the built-in fallback graph

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::classify::{Category, ClassifierRules};
use crate::layout::{layout_positions, Position};

#[cfg(test)]
mod tests;

/// Errors surfaced by the scan boundary. A failed scan is always
/// non-destructive: the current snapshot stays displayed.
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("scan request failed: {0}")]
    Request(String),
    #[error("malformed scan payload: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// One state as reported by the external scan.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanState {
    /// Raw state name; treated as an opaque identifier
    pub name: String,
    /// Whether the state carries an attached behavior clip
    #[serde(default)]
    pub has_annotation: bool,
}

/// One transition as reported by the external scan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanTransition {
    pub from: String,
    pub to: String,
    /// Free-text guard condition, if known
    #[serde(default)]
    pub rule: Option<String>,
}

/// The scan input contract (spec'd external interface).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScanPayload {
    #[serde(default)]
    pub states: Vec<ScanState>,
    #[serde(default)]
    pub transitions: Vec<ScanTransition>,
}

impl ScanPayload {
    pub fn from_json(source: &str) -> Result<Self, ScanError> {
        Ok(serde_json::from_str(source)?)
    }

    /// A payload with no states is not authoritative; the fallback graph wins.
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}

/// A node in the behavior graph.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateNode {
    /// Stable identifier, unique within one snapshot
    pub id: String,
    /// Display name (raw scanned name, or fallback title)
    pub label: String,
    /// Derived by the layout engine; never hand-edited
    pub position: Position,
    /// Derived by the classifier; recomputed on every rebuild
    pub category: Category,
    /// Carried through from the scan, independent of category
    pub has_annotation: bool,
}

/// A directed, optionally-guarded edge between two states.
///
/// `(a, b)` and `(b, a)` are logically distinct edges and are stored
/// separately. Endpoints may dangle; use sites filter those out silently.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransitionEdge {
    pub from: String,
    pub to: String,
    pub rule: Option<String>,
}

impl TransitionEdge {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            rule: None,
        }
    }

    pub fn with_rule(mut self, rule: impl Into<String>) -> Self {
        self.rule = Some(rule.into());
        self
    }
}

/// Where a snapshot's data came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SnapshotOrigin {
    /// Built-in example graph shown before any scan succeeds
    Fallback,
    /// Produced by a completed external scan
    Scan,
}

/// One immutable capture of the full state/transition graph.
///
/// A new scan always produces a brand-new snapshot; nothing mutates a
/// snapshot in place. That immutability is what makes diffing well-defined.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphSnapshot {
    pub origin: SnapshotOrigin,
    pub states: Vec<StateNode>,
    pub transitions: Vec<TransitionEdge>,
}

impl GraphSnapshot {
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn state_ids(&self) -> HashSet<String> {
        self.states.iter().map(|s| s.id.clone()).collect()
    }

    pub fn contains_state(&self, id: &str) -> bool {
        self.states.iter().any(|s| s.id == id)
    }

    pub fn state(&self, id: &str) -> Option<&StateNode> {
        self.states.iter().find(|s| s.id == id)
    }

    /// All edges leaving `from`, dangling targets included.
    pub fn outgoing<'a>(&'a self, from: &'a str) -> impl Iterator<Item = &'a TransitionEdge> + 'a {
        self.transitions.iter().filter(move |t| t.from == from)
    }

    pub fn has_edge(&self, from: &str, to: &str) -> bool {
        self.transitions.iter().any(|t| t.from == from && t.to == to)
    }

    /// Edges whose endpoints both resolve to states in this snapshot.
    pub fn resolved_transitions(&self) -> Vec<&TransitionEdge> {
        let ids = self.state_ids();
        self.transitions
            .iter()
            .filter(|t| ids.contains(&t.from) && ids.contains(&t.to))
            .collect()
    }
}

/// Deterministic id for a scanned state name.
pub fn scan_state_id(name: &str) -> String {
    format!("scan:{}", name)
}

/// Entry state id of the fallback graph.
pub const FALLBACK_ENTRY: &str = "idle";

// Fallback locomotion graph: (id, label, has_annotation).
const FALLBACK_STATES: &[(&str, &str, bool)] = &[
    ("idle", "Idle", false),
    ("walk", "Walk", false),
    ("run", "Run", false),
    ("jump", "Jump", true),
    ("fall", "Fall", false),
    ("land", "Land", true),
];

const FALLBACK_TRANSITIONS: &[(&str, &str, Option<&str>)] = &[
    ("idle", "walk", Some("speed > 0.1")),
    ("walk", "idle", Some("speed < 0.1")),
    ("walk", "run", Some("speed > 3.0")),
    ("run", "walk", Some("speed < 3.0")),
    ("walk", "jump", Some("jump pressed")),
    ("run", "jump", Some("jump pressed")),
    ("jump", "fall", Some("vertical velocity < 0")),
    ("fall", "land", Some("grounded")),
    ("land", "idle", None),
];

/// Build the authoritative snapshot for display.
///
/// A scan payload with at least one state fully replaces the fallback
/// graph; otherwise the fallback graph is used. There is no merging.
/// Layout and classification run as part of the build, so positions and
/// categories are always fresh for the snapshot they belong to.
pub fn build_snapshot(payload: Option<&ScanPayload>, rules: &ClassifierRules) -> GraphSnapshot {
    match payload {
        Some(p) if !p.is_empty() => scanned_snapshot(p, rules),
        _ => fallback_snapshot(rules),
    }
}

fn scanned_snapshot(payload: &ScanPayload, rules: &ClassifierRules) -> GraphSnapshot {
    let positions = layout_positions(payload.states.len());
    let states = payload
        .states
        .iter()
        .zip(positions)
        .map(|(s, position)| StateNode {
            id: scan_state_id(&s.name),
            label: s.name.clone(),
            position,
            category: rules.classify(&s.name, s.has_annotation),
            has_annotation: s.has_annotation,
        })
        .collect();

    let transitions = payload
        .transitions
        .iter()
        .map(|t| TransitionEdge {
            from: scan_state_id(&t.from),
            to: scan_state_id(&t.to),
            rule: t.rule.clone(),
        })
        .collect();

    GraphSnapshot {
        origin: SnapshotOrigin::Scan,
        states,
        transitions,
    }
}

fn fallback_snapshot(rules: &ClassifierRules) -> GraphSnapshot {
    let positions = layout_positions(FALLBACK_STATES.len());
    let states = FALLBACK_STATES
        .iter()
        .zip(positions)
        .map(|(&(id, label, has_annotation), position)| StateNode {
            id: id.to_string(),
            label: label.to_string(),
            position,
            category: rules.classify(label, has_annotation),
            has_annotation,
        })
        .collect();

    let transitions = FALLBACK_TRANSITIONS
        .iter()
        .map(|&(from, to, rule)| {
            let edge = TransitionEdge::new(from, to);
            match rule {
                Some(r) => edge.with_rule(r),
                None => edge,
            }
        })
        .collect();

    GraphSnapshot {
        origin: SnapshotOrigin::Fallback,
        states,
        transitions,
    }
}
