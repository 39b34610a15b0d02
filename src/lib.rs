//! Statevis - State-Transition Graph Engine
//! Deterministic layout, scan diffing and interactive simulation for
//! behavior-state visualizers

pub mod classify;
pub mod diff;
pub mod engine;
pub mod graph;
pub mod layout;
pub mod sim;

pub use classify::{Category, ClassifierRules};
pub use diff::{diff_snapshots, transition_key, DiffResult, DiffWindow, DIFF_TTL};
pub use engine::{EngineError, GraphEngine, RenderEdge, RenderModel, RenderNode, ScanTicket};
pub use graph::{
    build_snapshot, GraphSnapshot, ScanError, ScanPayload, SnapshotOrigin, StateNode,
    TransitionEdge,
};
pub use layout::{layout_positions, Position};
pub use sim::{compute_dead_ends, compute_reachable, SimulationSession};
