//! Translation of pointer and keyboard gestures into change batches.

use crate::{EdgeChange, FlowState, NodeChange};

/// What a click landed on
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClickTarget {
    Node(String),
    Edge(String),
    Empty,
}

/// Batches that make `target` the only selected element.
///
/// Only elements whose selection actually changes get an entry.
pub fn selection_changes(
    state: &FlowState,
    target: &ClickTarget,
) -> (Vec<NodeChange>, Vec<EdgeChange>) {
    let node_wanted = |id: &str| matches!(target, ClickTarget::Node(t) if t == id);
    let edge_wanted = |id: &str| matches!(target, ClickTarget::Edge(t) if t == id);

    let node_changes = state
        .nodes()
        .iter()
        .filter(|n| n.selected != node_wanted(&n.id))
        .map(|n| NodeChange::select(n.id.clone(), !n.selected))
        .collect();

    let edge_changes = state
        .edges()
        .iter()
        .filter(|e| e.selected != edge_wanted(&e.id))
        .map(|e| EdgeChange::select(e.id.clone(), !e.selected))
        .collect();

    (node_changes, edge_changes)
}

/// Removal batches for everything currently selected
pub fn removal_changes(state: &FlowState) -> (Vec<NodeChange>, Vec<EdgeChange>) {
    let node_changes = state
        .selected_nodes()
        .map(|n| NodeChange::remove(n.id.clone()))
        .collect();
    let edge_changes = state
        .selected_edges()
        .map(|e| EdgeChange::remove(e.id.clone()))
        .collect();

    (node_changes, edge_changes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_click_node_selects_only_it() {
        let mut state = FlowState::new();
        state.on_edges_change(&[EdgeChange::select("e1-2", true)]);

        let (nodes, edges) = selection_changes(&state, &ClickTarget::Node("2".to_string()));

        assert_eq!(nodes, vec![NodeChange::select("2", true)]);
        assert_eq!(edges, vec![EdgeChange::select("e1-2", false)]);
    }

    #[test]
    fn test_click_selected_node_is_noop() {
        let mut state = FlowState::new();
        state.on_nodes_change(&[NodeChange::select("1", true)]);

        let (nodes, edges) = selection_changes(&state, &ClickTarget::Node("1".to_string()));

        assert!(nodes.is_empty());
        assert!(edges.is_empty());
    }

    #[test]
    fn test_click_edge_clears_nodes() {
        let mut state = FlowState::new();
        state.on_nodes_change(&[NodeChange::select("1", true), NodeChange::select("3", true)]);

        let (nodes, edges) = selection_changes(&state, &ClickTarget::Edge("e2-3".to_string()));

        assert_eq!(
            nodes,
            vec![NodeChange::select("1", false), NodeChange::select("3", false)]
        );
        assert_eq!(edges, vec![EdgeChange::select("e2-3", true)]);
    }

    #[test]
    fn test_click_empty_clears_everything() {
        let mut state = FlowState::new();
        state.on_nodes_change(&[NodeChange::select("2", true)]);
        state.on_edges_change(&[EdgeChange::select("e2-3", true)]);

        let (nodes, edges) = selection_changes(&state, &ClickTarget::Empty);
        state.on_nodes_change(&nodes);
        state.on_edges_change(&edges);

        assert_eq!(state.selected_nodes().count(), 0);
        assert_eq!(state.selected_edges().count(), 0);
    }

    #[test]
    fn test_delete_removes_selection() {
        let mut state = FlowState::new();
        state.on_nodes_change(&[NodeChange::select("3", true)]);
        state.on_edges_change(&[EdgeChange::select("e1-2", true)]);

        let (nodes, edges) = removal_changes(&state);
        state.on_nodes_change(&nodes);
        state.on_edges_change(&edges);

        assert_eq!(state.node_count(), 2);
        assert!(state.get_node("3").is_none());
        assert_eq!(state.edge_count(), 1);
        // No referential cleanup: e2-3 still points at the removed node
        assert_eq!(state.edges()[0].target, "3");
    }
}
