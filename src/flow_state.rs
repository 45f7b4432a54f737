use crate::{
    ChangeKind, ChangeRecord, Connection, Edge, EdgeChange, EdgeIdStrategy, IdGenerator, Node,
    NodeChange, NodeData, Position,
};
use std::collections::HashSet;
use tracing::{debug, info};

/// Nodes the demo diagram starts with
pub fn initial_nodes() -> Vec<Node> {
    vec![
        Node::new("1", Position::new(0.0, 0.0), NodeData::label("Start")),
        Node::new("2", Position::new(0.0, 100.0), NodeData::label("Process")),
        Node::new("3", Position::new(0.0, 200.0), NodeData::label("End")),
    ]
}

/// Edges the demo diagram starts with
pub fn initial_edges() -> Vec<Edge> {
    vec![Edge::new("e1-2", "1", "2"), Edge::new("e2-3", "2", "3")]
}

// ========== Pure transitions ==========

/// Apply a node change batch in order, returning the next node collection.
///
/// Entries naming an unknown id are skipped; the rest of the batch still applies.
pub fn apply_node_changes(changes: &[NodeChange], nodes: &[Node]) -> Vec<Node> {
    apply_node_changes_counted(changes, nodes).0
}

/// Apply an edge change batch in order, returning the next edge collection.
pub fn apply_edge_changes(changes: &[EdgeChange], edges: &[Edge]) -> Vec<Edge> {
    apply_edge_changes_counted(changes, edges).0
}

/// Append the edge for `connection` with an id not used by any of `edges`.
///
/// Node existence, duplicates and self-loops are not checked.
pub fn add_edge(connection: Connection, edges: &[Edge], ids: &mut IdGenerator) -> Vec<Edge> {
    let existing: HashSet<&str> = edges.iter().map(|e| e.id.as_str()).collect();
    let id = ids.edge_id(&connection.source, &connection.target, &existing);

    let mut next = edges.to_vec();
    next.push(Edge::from_connection(id, connection));
    next
}

fn apply_node_changes_counted(changes: &[NodeChange], nodes: &[Node]) -> (Vec<Node>, usize) {
    let mut next = nodes.to_vec();
    let mut skipped = 0;

    for change in changes {
        let Some(index) = next.iter().position(|n| n.id == change.id()) else {
            debug!(id = change.id(), "skipping node change for unknown node");
            skipped += 1;
            continue;
        };

        match change {
            NodeChange::Position { position, .. } => {
                if let Some(position) = position {
                    next[index].set_position(*position);
                }
            }
            NodeChange::Select { selected, .. } => next[index].set_selected(*selected),
            NodeChange::Remove { .. } => {
                next.remove(index);
            }
        }
    }

    (next, skipped)
}

fn apply_edge_changes_counted(changes: &[EdgeChange], edges: &[Edge]) -> (Vec<Edge>, usize) {
    let mut next = edges.to_vec();
    let mut skipped = 0;

    for change in changes {
        let Some(index) = next.iter().position(|e| e.id == change.id()) else {
            debug!(id = change.id(), "skipping edge change for unknown edge");
            skipped += 1;
            continue;
        };

        match change {
            EdgeChange::Select { selected, .. } => next[index].set_selected(*selected),
            EdgeChange::Remove { .. } => {
                next.remove(index);
            }
        }
    }

    (next, skipped)
}

// ========== Owner ==========

/// Oldest change records are dropped past this many
pub const MAX_HISTORY: usize = 256;

/// Authoritative node and edge collections for one mounted view
#[derive(Debug, Clone)]
pub struct FlowState {
    nodes: Vec<Node>,

    edges: Vec<Edge>,

    edge_ids: IdGenerator,

    /// History trail of applied operations
    history: Vec<ChangeRecord>,
}

impl FlowState {
    /// Seed the demo graph
    pub fn new() -> Self {
        Self::with_strategy(EdgeIdStrategy::default())
    }

    /// Seed the demo graph, generating connect ids with `strategy`
    pub fn with_strategy(strategy: EdgeIdStrategy) -> Self {
        Self::from_parts(initial_nodes(), initial_edges(), strategy)
    }

    /// Start from arbitrary collections
    pub fn from_parts(nodes: Vec<Node>, edges: Vec<Edge>, strategy: EdgeIdStrategy) -> Self {
        Self {
            nodes,
            edges,
            edge_ids: IdGenerator::new(strategy),
            history: Vec::new(),
        }
    }

    /// Node change callback
    pub fn on_nodes_change(&mut self, changes: &[NodeChange]) {
        if changes.is_empty() {
            return;
        }
        let (next, skipped) = apply_node_changes_counted(changes, &self.nodes);
        self.nodes = next;

        self.log(ChangeKind::NodesChanged {
            applied: changes.len() - skipped,
            skipped,
        });
    }

    /// Edge change callback
    pub fn on_edges_change(&mut self, changes: &[EdgeChange]) {
        if changes.is_empty() {
            return;
        }
        let (next, skipped) = apply_edge_changes_counted(changes, &self.edges);
        self.edges = next;

        self.log(ChangeKind::EdgesChanged {
            applied: changes.len() - skipped,
            skipped,
        });
    }

    pub fn edge_id_strategy(&self) -> EdgeIdStrategy {
        self.edge_ids.strategy()
    }

    /// Connect callback, returning the id of the appended edge
    pub fn on_connect(&mut self, connection: Connection) -> String {
        self.edges = add_edge(connection, &self.edges, &mut self.edge_ids);

        // add_edge always appends
        let edge = &self.edges[self.edges.len() - 1];
        let (edge_id, source, target) = (edge.id.clone(), edge.source.clone(), edge.target.clone());
        info!(edge_id = %edge_id, source = %source, target = %target, "connected nodes");

        self.log(ChangeKind::Connected {
            edge_id: edge_id.clone(),
            source,
            target,
        });

        edge_id
    }

    // ========== Queries ==========

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn get_node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn get_edge(&self, id: &str) -> Option<&Edge> {
        self.edges.iter().find(|e| e.id == id)
    }

    pub fn selected_nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter().filter(|n| n.selected)
    }

    pub fn selected_edges(&self) -> impl Iterator<Item = &Edge> {
        self.edges.iter().filter(|e| e.selected)
    }

    /// Get all edges starting from a node
    pub fn outgoing_edges(&self, node_id: &str) -> Vec<&Edge> {
        self.edges.iter().filter(|e| e.starts_from(node_id)).collect()
    }

    /// Get all edges ending at a node
    pub fn incoming_edges(&self, node_id: &str) -> Vec<&Edge> {
        self.edges.iter().filter(|e| e.ends_at(node_id)).collect()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    // ========== Change log ==========

    fn log(&mut self, kind: ChangeKind) {
        self.history.push(ChangeRecord::new(kind));
        if self.history.len() > MAX_HISTORY {
            let excess = self.history.len() - MAX_HISTORY;
            self.history.drain(..excess);
        }
    }

    pub fn history(&self) -> &[ChangeRecord] {
        &self.history
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
    }
}

impl Default for FlowState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_initial_graph() {
        let state = FlowState::new();

        let ids: Vec<_> = state.nodes().iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2", "3"]);
        let ys: Vec<_> = state.nodes().iter().map(|n| n.position.y).collect();
        assert_eq!(ys, vec![0.0, 100.0, 200.0]);

        assert_eq!(
            state.edges(),
            &[Edge::new("e1-2", "1", "2"), Edge::new("e2-3", "2", "3")]
        );
        assert!(state.history().is_empty());
    }

    #[test]
    fn test_position_change_moves_only_target() {
        let nodes = initial_nodes();
        let next = apply_node_changes(&[NodeChange::position("2", Position::new(40.0, 120.0))], &nodes);

        assert_eq!(next[1].position, Position::new(40.0, 120.0));
        assert_eq!(next[0], nodes[0]);
        assert_eq!(next[2], nodes[2]);
        assert_eq!(next[1].data, nodes[1].data);
    }

    #[test]
    fn test_drag_end_without_position_is_noop() {
        let nodes = initial_nodes();
        let change = NodeChange::Position {
            id: "1".to_string(),
            position: None,
        };

        assert_eq!(apply_node_changes(&[change], &nodes), nodes);
    }

    #[test]
    fn test_changes_apply_in_order() {
        let nodes = initial_nodes();
        let next = apply_node_changes(
            &[
                NodeChange::position("1", Position::new(10.0, 10.0)),
                NodeChange::position("1", Position::new(20.0, 30.0)),
                NodeChange::select("1", true),
                NodeChange::select("1", false),
            ],
            &nodes,
        );

        assert_eq!(next[0].position, Position::new(20.0, 30.0));
        assert!(!next[0].selected);
    }

    #[test]
    fn test_remove_then_update_same_node_skips_update() {
        let nodes = initial_nodes();
        let next = apply_node_changes(
            &[NodeChange::remove("3"), NodeChange::select("3", true)],
            &nodes,
        );

        assert_eq!(next.len(), 2);
        assert!(next.iter().all(|n| n.id != "3"));
    }

    #[test]
    fn test_unknown_ids_are_isolated() {
        let mut state = FlowState::new();
        state.on_nodes_change(&[
            NodeChange::position("missing", Position::new(1.0, 1.0)),
            NodeChange::select("2", true),
        ]);

        assert!(state.get_node("2").unwrap().selected);
        assert_eq!(state.node_count(), 3);
        assert_matches!(
            state.history()[0].kind,
            ChangeKind::NodesChanged {
                applied: 1,
                skipped: 1
            }
        );
    }

    #[test]
    fn test_edge_select_and_remove() {
        let mut state = FlowState::new();
        state.on_edges_change(&[EdgeChange::select("e2-3", true)]);
        assert!(state.get_edge("e2-3").unwrap().selected);

        state.on_edges_change(&[EdgeChange::remove("e1-2")]);
        assert_eq!(state.edge_count(), 1);
        assert!(state.get_edge("e1-2").is_none());
        assert!(state.get_edge("e2-3").unwrap().selected);
    }

    #[test]
    fn test_connect_appends_fresh_edge() {
        let mut state = FlowState::new();

        let first = state.on_connect(Connection::new("1", "3"));
        let second = state.on_connect(Connection::new("1", "3"));

        assert_eq!(first, "e1-3");
        assert_ne!(first, second);
        assert_eq!(state.edge_count(), 4);
        let tail = &state.edges()[2..];
        assert!(tail.iter().all(|e| e.source == "1" && e.target == "3"));
    }

    #[test]
    fn test_connect_accepts_self_loops_and_unknown_nodes() {
        let mut state = FlowState::new();

        state.on_connect(Connection::new("2", "2"));
        state.on_connect(Connection::new("9", "1"));

        assert_eq!(state.edge_count(), 4);
        assert_eq!(state.incoming_edges("2").len(), 2);
        assert_eq!(state.outgoing_edges("9").len(), 1);
    }

    #[test]
    fn test_connect_avoids_reseeded_ids() {
        let edges = vec![Edge::new("e1-3", "2", "1")];
        let mut ids = IdGenerator::default();

        let next = add_edge(Connection::new("1", "3"), &edges, &mut ids);

        assert_eq!(next.len(), 2);
        assert_eq!(next[1].id, "e1-3-00");
        assert_eq!(next[0], edges[0]);
    }

    #[test]
    fn test_empty_batches_leave_history_untouched() {
        let mut state = FlowState::new();
        state.on_nodes_change(&[]);
        state.on_edges_change(&[]);

        assert!(state.history().is_empty());
        assert_eq!(state.nodes(), initial_nodes().as_slice());
    }

    #[test]
    fn test_history_records_connect() {
        let mut state = FlowState::new();
        let id = state.on_connect(Connection::new("1", "3"));

        assert_eq!(state.history().len(), 1);
        match &state.history()[0].kind {
            ChangeKind::Connected {
                edge_id,
                source,
                target,
            } => {
                assert_eq!(edge_id, &id);
                assert_eq!(source, "1");
                assert_eq!(target, "3");
            }
            other => panic!("Expected Connected record, got {:?}", other),
        }

        state.clear_history();
        assert!(state.history().is_empty());
    }

    #[test]
    fn test_state_reports_edge_id_strategy() {
        assert_eq!(FlowState::new().edge_id_strategy(), EdgeIdStrategy::Sequential);

        let mut state = FlowState::with_strategy(EdgeIdStrategy::Ulid);
        assert_eq!(state.edge_id_strategy(), EdgeIdStrategy::Ulid);
        let id = state.on_connect(Connection::new("2", "2"));
        assert!(id.starts_with("e2-2-"));
    }

    #[test]
    fn test_long_drag_keeps_history_bounded() {
        let mut state = FlowState::new();
        state.on_connect(Connection::new("1", "3"));

        for frame in 0..10_000 {
            let step = frame as f32;
            state.on_nodes_change(&[NodeChange::position("2", Position::new(step, 100.0 + step))]);
        }

        assert_eq!(state.history().len(), MAX_HISTORY);
        assert_eq!(state.get_node("2").unwrap().position, Position::new(9_999.0, 10_099.0));
        // The connect scrolled out; only drag frames remain
        assert!(state
            .history()
            .iter()
            .all(|r| matches!(r.kind, ChangeKind::NodesChanged { applied: 1, skipped: 0 })));
    }
}
