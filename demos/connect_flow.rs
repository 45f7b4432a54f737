//! Example: driving the graph state core the way a rendering surface would
//!
//! This example demonstrates:
//! - Seeding the demo graph
//! - Feeding JSON change batches into the node/edge handlers
//! - Connecting nodes with both edge id strategies
//! - Reading adjacency in both directions

use anyhow::Result;
use ogbt_flow::*;

fn main() -> Result<()> {
    init_tracing("info");
    println!("=== OGBT: Connect Flow Example ===\n");

    // Step 1: Seed
    println!("Step 1: Seeding graph...");
    let mut state = FlowState::new();
    println!("  ✓ {} nodes, {} edges", state.node_count(), state.edge_count());

    // Step 2: A surface sends changes as JSON
    println!("\nStep 2: Applying a change batch from JSON...");
    let batch = r#"[
        {"type":"select","id":"1","selected":true},
        {"type":"position","id":"1","position":{"x":-80.0,"y":20.0}},
        {"type":"position","id":"42","position":{"x":0.0,"y":0.0}}
    ]"#;
    let changes: Vec<NodeChange> = serde_json::from_str(batch)?;
    state.on_nodes_change(&changes);
    if let Some(record) = state.history().last() {
        println!("  ✓ {:?}", record.kind);
    }

    // Step 3: Connect
    println!("\nStep 3: Connecting nodes...");
    let id = state.on_connect(Connection::new("1", "3"));
    println!("  ✓ sequential id: {}", id);
    let id = state.on_connect(Connection::new("3", "3"));
    println!("  ✓ self-loop accepted: {}", id);

    let mut ulid_state = FlowState::with_strategy(EdgeIdStrategy::Ulid);
    let id = ulid_state.on_connect(Connection::new("1", "3"));
    println!("  ✓ ulid id: {}", id);

    // Step 4: Adjacency
    println!("\nStep 4: Adjacency...");
    let forward = Adjacency::from_flow(state.nodes(), state.edges(), Direction::Forward)?;
    let reverse = Adjacency::from_flow(state.nodes(), state.edges(), Direction::Reverse)?;
    for (i, node) in state.nodes().iter().enumerate() {
        println!(
            "  {} '{}': out {:?}, in {:?}",
            node.id,
            node.label(),
            forward.neighbors(i as u32),
            reverse.neighbors(i as u32)
        );
    }

    // Step 5: Snapshot out to the surface
    println!("\nStep 5: Edge snapshot as JSON...");
    println!("{}", serde_json::to_string_pretty(state.edges())?);

    println!("\n=== Example Complete ===");
    Ok(())
}
