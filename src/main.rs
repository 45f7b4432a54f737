use ogbt_flow::{Adjacency, Connection, Direction, EdgeChange, FlowState, NodeChange, Position};

fn main() {
    ogbt_flow::init_tracing("warn");

    println!("OGBT flow editor - graph state core");
    println!("===================================\n");

    let mut state = FlowState::new();

    println!("✓ Seeded demo graph");
    for node in state.nodes() {
        println!(
            "  node {} '{}' at ({}, {})",
            node.id,
            node.label(),
            node.position.x,
            node.position.y
        );
    }
    for edge in state.edges() {
        println!("  edge {}: {} -> {}", edge.id, edge.source, edge.target);
    }

    // Simulate a drag of the middle node
    state.on_nodes_change(&[
        NodeChange::position("2", Position::new(60.0, 110.0)),
        NodeChange::position("2", Position::new(120.0, 120.0)),
    ]);
    println!("\n✓ Dragged node 2");
    if let Some(node) = state.get_node("2") {
        println!("  now at ({}, {})", node.position.x, node.position.y);
    }

    // Two connect gestures between the same pair
    let first = state.on_connect(Connection::new("1", "3"));
    let second = state.on_connect(Connection::new("1", "3"));
    println!("\n✓ Connected 1 -> 3 twice: {} and {}", first, second);

    // Select and remove an edge
    state.on_edges_change(&[EdgeChange::select("e2-3", true)]);
    state.on_edges_change(&[EdgeChange::remove("e2-3"), EdgeChange::remove("missing")]);
    println!("\n✓ Removed edge e2-3");

    println!("\n📊 Graph:");
    println!("  └─ Nodes: {}", state.node_count());
    println!("  └─ Edges: {}", state.edge_count());
    println!("  └─ Changes logged: {}", state.history().len());

    match Adjacency::from_flow(state.nodes(), state.edges(), Direction::Forward) {
        Ok(adjacency) => {
            println!("\n🔗 Out-degrees:");
            for (i, node) in state.nodes().iter().enumerate() {
                println!("  {} -> {}", node.id, adjacency.degree(i as u32));
            }
        }
        Err(e) => println!("\n⚠ Adjacency unavailable: {}", e),
    }
}
