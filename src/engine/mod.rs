//! Graph Engine
//! Host-facing controller tying the model, diff and simulation together.
//! All process-wide state (snapshot slots, in-flight scan guard, diff
//! window) lives here explicitly; nothing is ambient.

use std::collections::HashMap;
use std::time::Instant;

use serde::Serialize;
use thiserror::Error;

use crate::classify::{Category, ClassifierRules};
use crate::diff::{diff_snapshots, transition_key, DiffResult, DiffWindow};
use crate::graph::{build_snapshot, GraphSnapshot, ScanError, ScanPayload, SnapshotOrigin};
use crate::sim::SimulationSession;


#[derive(Error, Debug)]
pub enum EngineError {
    #[error("a scan is already in flight")]
    ScanInFlight,
}

/// Token handed out per scan request. Completing or failing a scan
/// requires the matching ticket, so a cancelled request's late result is
/// silently dropped instead of clobbering the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanTicket(u64);

/// One node of the rendering output contract.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderNode {
    pub id: String,
    pub label: String,
    pub x: f32,
    pub y: f32,
    pub category: Category,
    pub completed: bool,
    pub is_active: bool,
    pub is_new: bool,
}

/// One edge of the rendering output contract. Dangling edges never appear.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderEdge {
    pub from: String,
    pub to: String,
    pub rule: Option<String>,
    pub is_simulated: bool,
    pub is_modified: bool,
}

/// Full render output, recomputed on every call, never cached.
#[derive(Debug, Clone, Serialize)]
pub struct RenderModel {
    pub nodes: Vec<RenderNode>,
    pub edges: Vec<RenderEdge>,
}

/// The engine owning the currently displayed graph.
///
/// Holds the current snapshot, a single-slot previous scan snapshot for
/// one-step diffing, at most one live diff window and at most one
/// simulation session. Time flows in through `Instant` arguments only; the
/// host owns any real timers.
pub struct GraphEngine {
    rules: ClassifierRules,
    current: GraphSnapshot,
    previous_scan: Option<GraphSnapshot>,
    diff: Option<DiffWindow>,
    sim: Option<SimulationSession>,
    in_flight: Option<ScanTicket>,
    next_ticket: u64,
}

impl Default for GraphEngine {
    fn default() -> Self {
        Self::new(ClassifierRules::default())
    }
}

impl GraphEngine {
    /// Start with the fallback graph displayed.
    pub fn new(rules: ClassifierRules) -> Self {
        let current = build_snapshot(None, &rules);
        Self {
            rules,
            current,
            previous_scan: None,
            diff: None,
            sim: None,
            in_flight: None,
            next_ticket: 0,
        }
    }

    pub fn snapshot(&self) -> &GraphSnapshot {
        &self.current
    }

    pub fn scan_in_flight(&self) -> bool {
        self.in_flight.is_some()
    }

    /// The diff result while its highlight window is still live.
    pub fn active_diff(&self, now: Instant) -> Option<&DiffResult> {
        self.diff
            .as_ref()
            .filter(|w| !w.expired(now))
            .map(|w| &w.result)
    }

    /// Per-category node counts of the current snapshot, for summaries.
    pub fn category_counts(&self) -> HashMap<Category, usize> {
        let mut counts = HashMap::new();
        for state in &self.current.states {
            *counts.entry(state.category).or_insert(0) += 1;
        }
        counts
    }

    /// Claim the single scan slot. At most one scan may be outstanding.
    pub fn begin_scan(&mut self) -> Result<ScanTicket, EngineError> {
        if self.in_flight.is_some() {
            return Err(EngineError::ScanInFlight);
        }
        let ticket = ScanTicket(self.next_ticket);
        self.next_ticket += 1;
        self.in_flight = Some(ticket);
        Ok(ticket)
    }

    /// Apply a completed scan. Returns false (and changes nothing) when the
    /// ticket is stale or cancelled.
    ///
    /// Replaces the displayed snapshot, discards any active simulation
    /// session, and computes a fresh diff when a previous scan snapshot
    /// exists. The diff window restarts from `now`, replacing any prior
    /// window rather than compounding onto it.
    pub fn complete_scan(&mut self, ticket: ScanTicket, payload: &ScanPayload, now: Instant) -> bool {
        if self.in_flight != Some(ticket) {
            log::debug!("dropping stale scan result for {:?}", ticket);
            return false;
        }
        self.in_flight = None;

        let next = build_snapshot(Some(payload), &self.rules);
        log::debug!(
            "scan applied: {} states, {} transitions ({:?})",
            next.states.len(),
            next.transitions.len(),
            next.origin
        );

        if next.origin == SnapshotOrigin::Scan {
            self.diff = self
                .previous_scan
                .as_ref()
                .map(|prev| DiffWindow::new(diff_snapshots(prev, &next), now));
            self.previous_scan = Some(next.clone());
        } else {
            // Empty payload fell back to the example graph; nothing to diff.
            self.diff = None;
        }

        if self.sim.take().is_some() {
            log::debug!("graph changed, simulation session discarded");
        }
        self.current = next;
        true
    }

    /// Record a failed scan. The current snapshot, diff window and
    /// simulation state all stay exactly as they were.
    pub fn fail_scan(&mut self, ticket: ScanTicket, error: &ScanError) -> bool {
        if self.in_flight != Some(ticket) {
            return false;
        }
        self.in_flight = None;
        log::warn!("scan failed, keeping displayed graph: {}", error);
        true
    }

    /// Abandon an outstanding scan (e.g. host teardown). A later
    /// `complete_scan` with this ticket becomes a no-op.
    pub fn cancel_scan(&mut self, ticket: ScanTicket) {
        if self.in_flight == Some(ticket) {
            self.in_flight = None;
        }
    }

    /// Drop the diff window once its 5-second highlight has run out.
    /// Invalidation is time-driven; call this from the host's timer.
    pub fn tick(&mut self, now: Instant) {
        if self.diff.as_ref().is_some_and(|w| w.expired(now)) {
            self.diff = None;
        }
    }

    /// Enter simulation mode. Computes nothing by itself; the first node
    /// click seeds the session.
    pub fn enter_simulation(&mut self) {
        if self.sim.is_none() {
            self.sim = Some(SimulationSession::new());
        }
    }

    pub fn exit_simulation(&mut self) {
        self.sim = None;
    }

    pub fn reset_simulation(&mut self) {
        if let Some(sim) = self.sim.as_mut() {
            sim.reset();
        }
    }

    pub fn simulation(&self) -> Option<&SimulationSession> {
        self.sim.as_ref()
    }

    /// Forward a node click to the active session. Returns true when the
    /// path changed; clicks outside simulation mode are ignored.
    pub fn click(&mut self, id: &str) -> bool {
        match self.sim.as_mut() {
            Some(sim) => sim.click(&self.current, id),
            None => false,
        }
    }

    /// Produce the rendering output contract for the presentation layer.
    ///
    /// `progress` is the external completed-flag mapping, merged read-only.
    /// Diff highlights appear only while the window is live at `now`.
    pub fn render(&self, progress: &HashMap<String, bool>, now: Instant) -> RenderModel {
        let diff = self.active_diff(now);
        let active_id = self.sim.as_ref().and_then(|s| s.current());
        let traversed = self
            .sim
            .as_ref()
            .map(|s| s.traversed_edges())
            .unwrap_or_default();

        let nodes = self
            .current
            .states
            .iter()
            .map(|s| RenderNode {
                id: s.id.clone(),
                label: s.label.clone(),
                x: s.position.x,
                y: s.position.y,
                category: s.category,
                completed: progress.get(&s.id).copied().unwrap_or(false),
                is_active: active_id == Some(s.id.as_str()),
                is_new: diff.is_some_and(|d| d.new_state_ids.contains(&s.id)),
            })
            .collect();

        let edges = self
            .current
            .resolved_transitions()
            .into_iter()
            .map(|t| RenderEdge {
                from: t.from.clone(),
                to: t.to.clone(),
                rule: t.rule.clone(),
                is_simulated: traversed.contains(&(t.from.clone(), t.to.clone())),
                is_modified: diff.is_some_and(|d| {
                    d.new_transition_keys.contains(&transition_key(&t.from, &t.to))
                }),
            })
            .collect();

        RenderModel { nodes, edges }
    }
}
