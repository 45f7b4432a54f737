// Helper functions to generate test graphs with various configurations

use ogbt_flow::{Edge, EdgeIdStrategy, FlowState, Node, NodeData, Position};

/// A straight chain `n0 -> n1 -> ... -> n{len-1}`, nodes spaced 100 apart
pub fn create_chain(len: usize) -> FlowState {
    let nodes = (0..len)
        .map(|i| {
            Node::new(
                format!("n{}", i),
                Position::new(0.0, i as f32 * 100.0),
                NodeData::label(format!("Step {}", i)),
            )
        })
        .collect();
    let edges = (1..len)
        .map(|i| Edge::new(format!("e{}-{}", i - 1, i), format!("n{}", i - 1), format!("n{}", i)))
        .collect();

    FlowState::from_parts(nodes, edges, EdgeIdStrategy::Sequential)
}

/// A -> B, B -> A
pub fn create_two_cycle() -> FlowState {
    let nodes = vec![
        Node::new("a", Position::new(0.0, 0.0), NodeData::label("A")),
        Node::new("b", Position::new(200.0, 0.0), NodeData::label("B")),
    ];
    let edges = vec![Edge::new("ea-b", "a", "b"), Edge::new("eb-a", "b", "a")];

    FlowState::from_parts(nodes, edges, EdgeIdStrategy::Sequential)
}

/// Demo graph plus an edge to a node that was never created
pub fn create_with_dangling_edge() -> FlowState {
    let mut state = FlowState::new();
    state.on_connect(ogbt_flow::Connection::new("3", "ghost"));
    state
}
