//! Unit tests for the graph model

use crate::classify::{Category, ClassifierRules};
use crate::graph::{
    build_snapshot, scan_state_id, GraphSnapshot, ScanPayload, SnapshotOrigin, FALLBACK_ENTRY,
};

fn payload_json(json: &str) -> ScanPayload {
    ScanPayload::from_json(json).unwrap()
}

#[test]
fn test_fallback_graph_shape() {
    let snapshot = build_snapshot(None, &ClassifierRules::default());
    assert_eq!(snapshot.origin, SnapshotOrigin::Fallback);
    assert_eq!(snapshot.states.len(), 6);
    assert_eq!(snapshot.transitions.len(), 9);
    assert!(snapshot.contains_state(FALLBACK_ENTRY));
    // Fallback ids are fixed literals, all unique.
    assert_eq!(snapshot.state_ids().len(), 6);

    let idle_walk = snapshot
        .transitions
        .iter()
        .find(|t| t.from == "idle" && t.to == "walk")
        .unwrap();
    assert_eq!(idle_walk.rule.as_deref(), Some("speed > 0.1"));
    let land_idle = snapshot
        .transitions
        .iter()
        .find(|t| t.from == "land" && t.to == "idle")
        .unwrap();
    assert!(land_idle.rule.is_none());
}

#[test]
fn test_fallback_states_are_motion_classified() {
    let snapshot = build_snapshot(None, &ClassifierRules::default());
    for state in &snapshot.states {
        assert_eq!(state.category, Category::PrimaryMotion, "{}", state.label);
    }
}

#[test]
fn test_empty_scan_payload_falls_back() {
    let payload = payload_json(r#"{ "states": [], "transitions": [] }"#);
    let snapshot = build_snapshot(Some(&payload), &ClassifierRules::default());
    assert_eq!(snapshot.origin, SnapshotOrigin::Fallback);
    assert_eq!(snapshot.states.len(), 6);
}

#[test]
fn test_scan_payload_replaces_fallback_entirely() {
    let payload = payload_json(
        r#"{
            "states": [
                { "name": "HitStun", "hasAnnotation": true },
                { "name": "Recover" }
            ],
            "transitions": [
                { "from": "HitStun", "to": "Recover", "rule": "timer done" }
            ]
        }"#,
    );
    let snapshot = build_snapshot(Some(&payload), &ClassifierRules::default());
    assert_eq!(snapshot.origin, SnapshotOrigin::Scan);
    assert_eq!(snapshot.states.len(), 2);
    assert_eq!(snapshot.transitions.len(), 1);
    // No trace of the fallback graph survives.
    assert!(!snapshot.contains_state(FALLBACK_ENTRY));
}

#[test]
fn test_scanned_ids_are_prefixed_and_labels_raw() {
    let payload = payload_json(r#"{ "states": [{ "name": "HitStun" }] }"#);
    let snapshot = build_snapshot(Some(&payload), &ClassifierRules::default());
    let state = &snapshot.states[0];
    assert_eq!(state.id, scan_state_id("HitStun"));
    assert_eq!(state.id, "scan:HitStun");
    assert_eq!(state.label, "HitStun");
    assert_eq!(state.category, Category::Response);
}

#[test]
fn test_missing_annotation_defaults_false() {
    let payload = payload_json(r#"{ "states": [{ "name": "Pose" }] }"#);
    assert!(!payload.states[0].has_annotation);
}

#[test]
fn test_malformed_payload_is_an_error() {
    assert!(ScanPayload::from_json("{ not json").is_err());
}

#[test]
fn test_resolved_transitions_drop_dangling_edges() {
    let payload = payload_json(
        r#"{
            "states": [{ "name": "A" }, { "name": "B" }],
            "transitions": [
                { "from": "A", "to": "B" },
                { "from": "A", "to": "Ghost" }
            ]
        }"#,
    );
    let snapshot = build_snapshot(Some(&payload), &ClassifierRules::default());
    // Dangling edges stay stored but are filtered on resolution.
    assert_eq!(snapshot.transitions.len(), 2);
    let resolved = snapshot.resolved_transitions();
    assert_eq!(resolved.len(), 1);
    assert_eq!(resolved[0].to, "scan:B");
}

#[test]
fn test_bidirectional_pair_kept_as_two_edges() {
    let snapshot = build_snapshot(None, &ClassifierRules::default());
    assert!(snapshot.has_edge("idle", "walk"));
    assert!(snapshot.has_edge("walk", "idle"));
    let both: Vec<_> = snapshot
        .transitions
        .iter()
        .filter(|t| {
            (t.from == "idle" && t.to == "walk") || (t.from == "walk" && t.to == "idle")
        })
        .collect();
    assert_eq!(both.len(), 2);
}

#[test]
fn test_positions_assigned_in_input_order() {
    let snapshot = build_snapshot(None, &ClassifierRules::default());
    let rebuilt = build_snapshot(None, &ClassifierRules::default());
    let positions = |s: &GraphSnapshot| s.states.iter().map(|n| n.position).collect::<Vec<_>>();
    assert_eq!(positions(&snapshot), positions(&rebuilt));
}
