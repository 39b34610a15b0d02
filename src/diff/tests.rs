//! Unit tests for the diff engine

use std::time::{Duration, Instant};

use crate::classify::ClassifierRules;
use crate::diff::{diff_snapshots, transition_key, DiffResult, DiffWindow, DIFF_TTL};
use crate::graph::{build_snapshot, GraphSnapshot, ScanPayload};

fn scan(json: &str) -> GraphSnapshot {
    let payload = ScanPayload::from_json(json).unwrap();
    build_snapshot(Some(&payload), &ClassifierRules::default())
}

const BASE: &str = r#"{
    "states": [{ "name": "Idle" }, { "name": "Walk" }],
    "transitions": [{ "from": "Idle", "to": "Walk", "rule": "speed > 0" }]
}"#;

#[test]
fn test_identical_snapshots_diff_to_empty() {
    let prev = scan(BASE);
    let next = scan(BASE);
    let result = diff_snapshots(&prev, &next);
    assert!(result.is_empty());
    // And again: diffing is idempotent.
    assert!(diff_snapshots(&prev, &next).is_empty());
}

#[test]
fn test_new_state_detected_by_name() {
    let prev = scan(BASE);
    let next = scan(
        r#"{
            "states": [{ "name": "Idle" }, { "name": "Walk" }, { "name": "Dash" }],
            "transitions": [{ "from": "Idle", "to": "Walk", "rule": "speed > 0" }]
        }"#,
    );
    let result = diff_snapshots(&prev, &next);
    assert_eq!(result.new_state_ids.len(), 1);
    assert!(result.new_state_ids.contains("scan:Dash"));
    assert!(result.new_transition_keys.is_empty());
}

#[test]
fn test_new_transition_detected_by_pair() {
    let prev = scan(BASE);
    let next = scan(
        r#"{
            "states": [{ "name": "Idle" }, { "name": "Walk" }],
            "transitions": [
                { "from": "Idle", "to": "Walk", "rule": "speed > 0" },
                { "from": "Walk", "to": "Idle" }
            ]
        }"#,
    );
    let result = diff_snapshots(&prev, &next);
    assert!(result.new_state_ids.is_empty());
    assert_eq!(result.new_transition_keys.len(), 1);
    assert!(result
        .new_transition_keys
        .contains(&transition_key("scan:Walk", "scan:Idle")));
}

#[test]
fn test_rule_change_on_same_pair_is_not_flagged() {
    let prev = scan(BASE);
    let next = scan(
        r#"{
            "states": [{ "name": "Idle" }, { "name": "Walk" }],
            "transitions": [{ "from": "Idle", "to": "Walk", "rule": "completely different" }]
        }"#,
    );
    // Only pair existence is compared; the rewritten rule goes unnoticed.
    assert!(diff_snapshots(&prev, &next).is_empty());
}

#[test]
fn test_reversed_pair_counts_as_new() {
    let prev = scan(BASE);
    let next = scan(
        r#"{
            "states": [{ "name": "Idle" }, { "name": "Walk" }],
            "transitions": [{ "from": "Walk", "to": "Idle" }]
        }"#,
    );
    let result = diff_snapshots(&prev, &next);
    assert!(result
        .new_transition_keys
        .contains(&transition_key("scan:Walk", "scan:Idle")));
}

#[test]
fn test_window_expires_after_ttl() {
    let started = Instant::now();
    let window = DiffWindow::new(DiffResult::default(), started);
    assert!(!window.expired(started));
    assert!(!window.expired(started + DIFF_TTL - Duration::from_millis(1)));
    assert!(window.expired(started + DIFF_TTL));
    assert!(window.expired(started + DIFF_TTL + Duration::from_secs(60)));
}
