//! Simulation Engine
//! Interactive path tracing over the displayed graph, plus structural
//! queries (reachability, dead ends)

use std::collections::HashSet;

use crate::graph::{GraphSnapshot, TransitionEdge};


/// All state ids reachable from `start` via zero or more directed edges.
///
/// Stack-based traversal; sibling order is unspecified but the resulting
/// set is deterministic. `start` is always included. The walk follows
/// every edge it is handed, so callers working against a snapshot with
/// possibly dangling edges pass the resolved edge list; an id reachable
/// only through a phantom endpoint must not count as reachable.
pub fn compute_reachable(transitions: &[TransitionEdge], start: &str) -> HashSet<String> {
    let mut reachable = HashSet::new();
    let mut stack = vec![start.to_string()];

    while let Some(id) = stack.pop() {
        if !reachable.insert(id.clone()) {
            continue;
        }
        for t in transitions.iter().filter(|t| t.from == id) {
            if !reachable.contains(&t.to) {
                stack.push(t.to.clone());
            }
        }
    }

    reachable
}

/// State ids with zero outgoing transitions, regardless of reachability.
pub fn compute_dead_ends(
    transitions: &[TransitionEdge],
    all_ids: &HashSet<String>,
) -> HashSet<String> {
    all_ids
        .iter()
        .filter(|id| !transitions.iter().any(|t| &t.from == *id))
        .cloned()
        .collect()
}

/// One interactive tracing session over the currently displayed graph.
///
/// The session starts idle. The first clicked node seeds the path and
/// fixes `unreachable`/`dead_ends` for the rest of the session; further
/// clicks extend the path only along existing edges. Invalid clicks are
/// silent no-ops. The host must discard the session (not re-validate it)
/// when the underlying graph changes, since ids are not stable across
/// snapshots.
#[derive(Debug, Clone, Default)]
pub struct SimulationSession {
    /// Ordered ids of visited states, empty while idle
    pub path: Vec<String>,
    /// Fixed once the first node is chosen
    pub unreachable: HashSet<String>,
    /// States with no way out of them, computed alongside `unreachable`
    pub dead_ends: HashSet<String>,
}

impl SimulationSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a path has been started.
    pub fn is_tracing(&self) -> bool {
        !self.path.is_empty()
    }

    /// The last visited state, if any.
    pub fn current(&self) -> Option<&str> {
        self.path.last().map(String::as_str)
    }

    /// Handle a node click. Returns true when the path changed.
    ///
    /// First click of any node present in the graph seeds the session;
    /// afterwards a click appends only when an edge from the current state
    /// to the clicked one exists. Everything else is ignored.
    pub fn click(&mut self, graph: &GraphSnapshot, id: &str) -> bool {
        match self.current() {
            None => {
                if !graph.contains_state(id) {
                    return false;
                }
                let all_ids = graph.state_ids();
                // Traversal must not pass through phantom endpoints, so
                // only edges resolving to real states feed reachability.
                let resolved: Vec<TransitionEdge> = graph
                    .resolved_transitions()
                    .into_iter()
                    .cloned()
                    .collect();
                let reachable = compute_reachable(&resolved, id);
                self.unreachable = all_ids.difference(&reachable).cloned().collect();
                self.dead_ends = compute_dead_ends(&graph.transitions, &all_ids);
                self.path.push(id.to_string());
                true
            }
            Some(last) => {
                if graph.has_edge(last, id) {
                    self.path.push(id.to_string());
                    true
                } else {
                    false
                }
            }
        }
    }

    /// Clear the path and both derived sets, returning to idle.
    pub fn reset(&mut self) {
        self.path.clear();
        self.unreachable.clear();
        self.dead_ends.clear();
    }

    /// Consecutive (from, to) pairs actually walked so far.
    pub fn traversed_edges(&self) -> HashSet<(String, String)> {
        self.path
            .windows(2)
            .map(|w| (w[0].clone(), w[1].clone()))
            .collect()
    }

    /// Ids that are legal next clicks from the current state.
    ///
    /// Purely informational; the click protocol already ignores anything
    /// not in this set.
    pub fn valid_next(&self, graph: &GraphSnapshot) -> HashSet<String> {
        match self.current() {
            Some(last) => graph.outgoing(last).map(|t| t.to.clone()).collect(),
            None => HashSet::new(),
        }
    }
}
