//! Statevis CLI - inspect a scan payload the way the engine sees it

use std::collections::HashSet;
use std::env;
use std::fs;

use statevis::{compute_dead_ends, compute_reachable, GraphEngine, GraphSnapshot, ScanPayload};

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        println!("Statevis CLI - State-Transition Graph Engine");
        println!("Usage: statevis-cli <scan.json>");
        println!("       statevis-cli --fallback");
        println!();
        println!("Example: statevis-cli demos/locomotion_scan.json");
        return;
    }

    if args[1] == "--fallback" {
        let engine = GraphEngine::default();
        println!("✅ Built-in fallback graph:");
        report(engine.snapshot());
        return;
    }

    let filename = &args[1];

    match fs::read_to_string(filename) {
        Ok(content) => match ScanPayload::from_json(&content) {
            Ok(payload) => {
                let mut engine = GraphEngine::default();
                match engine.begin_scan() {
                    Ok(ticket) => {
                        engine.complete_scan(ticket, &payload, std::time::Instant::now());
                        println!("✅ Scan loaded: {}", filename);
                        report(engine.snapshot());
                    }
                    Err(e) => eprintln!("❌ {}", e),
                }
            }
            Err(e) => {
                eprintln!("❌ Could not parse scan payload: {}", e);
            }
        },
        Err(e) => {
            eprintln!("❌ Could not read file '{}': {}", filename, e);
        }
    }
}

fn report(snapshot: &GraphSnapshot) {
    println!();
    println!("  States: {}", snapshot.states.len());
    for state in &snapshot.states {
        println!(
            "    - {} ({:?}) at ({:.1}, {:.1})",
            state.label, state.category, state.position.x, state.position.y
        );
    }

    println!("  Transitions: {}", snapshot.transitions.len());
    for t in &snapshot.transitions {
        let rule = t.rule.as_deref().unwrap_or("-");
        println!("    {} --> {} : {}", t.from, t.to, rule);
    }

    let dangling = snapshot.transitions.len() - snapshot.resolved_transitions().len();
    if dangling > 0 {
        println!("  Dangling transitions (ignored): {}", dangling);
    }

    let all_ids = snapshot.state_ids();
    let dead_ends = compute_dead_ends(&snapshot.transitions, &all_ids);
    println!("  Dead ends: {}", format_ids(&dead_ends));

    if let Some(entry) = snapshot.states.first() {
        let resolved: Vec<_> = snapshot
            .resolved_transitions()
            .into_iter()
            .cloned()
            .collect();
        let reachable = compute_reachable(&resolved, &entry.id);
        let unreachable: HashSet<String> = all_ids.difference(&reachable).cloned().collect();
        println!(
            "  Unreachable from {}: {}",
            entry.label,
            format_ids(&unreachable)
        );
    }
}

fn format_ids(ids: &HashSet<String>) -> String {
    if ids.is_empty() {
        return "none".to_string();
    }
    let mut sorted: Vec<&str> = ids.iter().map(String::as_str).collect();
    sorted.sort_unstable();
    sorted.join(", ")
}
