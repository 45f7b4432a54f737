// OGBT flow editor - Core Library

pub mod adjacency;
pub mod change;
pub mod config;
pub mod edge;
pub mod flow_state;
pub mod gestures;
pub mod id_generator;
pub mod node;
pub mod ui;
pub mod viewport;

// Re-export main types for convenience
pub use adjacency::{Adjacency, AdjacencyError, Direction};
pub use change::{ChangeKind, ChangeRecord, EdgeChange, NodeChange};
pub use config::{FlowConfig, Theme};
pub use edge::{Connection, Edge};
pub use flow_state::{add_edge, apply_edge_changes, apply_node_changes, FlowState};
pub use id_generator::{EdgeIdStrategy, IdGenerator};
pub use node::{Node, NodeData, Position};
pub use ui::FlowEditorApp;
pub use viewport::Viewport;

use tracing_subscriber::EnvFilter;

/// Install the global `tracing` subscriber; `RUST_LOG` overrides `default_filter`
pub fn init_tracing(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    // A second call (e.g. from tests) keeps the first subscriber
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}
