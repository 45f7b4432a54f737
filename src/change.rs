use crate::Position;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One edit to the node collection, as reported by the rendering surface
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NodeChange {
    /// Node moved. `position` is absent when a drag ends without a final move.
    Position {
        id: String,
        #[serde(default)]
        position: Option<Position>,
    },

    Select { id: String, selected: bool },

    Remove { id: String },
}

impl NodeChange {
    pub fn position(id: impl Into<String>, position: Position) -> Self {
        NodeChange::Position {
            id: id.into(),
            position: Some(position),
        }
    }

    pub fn select(id: impl Into<String>, selected: bool) -> Self {
        NodeChange::Select {
            id: id.into(),
            selected,
        }
    }

    pub fn remove(id: impl Into<String>) -> Self {
        NodeChange::Remove { id: id.into() }
    }

    /// Id of the node this change targets
    pub fn id(&self) -> &str {
        match self {
            NodeChange::Position { id, .. }
            | NodeChange::Select { id, .. }
            | NodeChange::Remove { id } => id,
        }
    }
}

/// One edit to the edge collection
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EdgeChange {
    Select { id: String, selected: bool },

    Remove { id: String },
}

impl EdgeChange {
    pub fn select(id: impl Into<String>, selected: bool) -> Self {
        EdgeChange::Select {
            id: id.into(),
            selected,
        }
    }

    pub fn remove(id: impl Into<String>) -> Self {
        EdgeChange::Remove { id: id.into() }
    }

    /// Id of the edge this change targets
    pub fn id(&self) -> &str {
        match self {
            EdgeChange::Select { id, .. } | EdgeChange::Remove { id } => id,
        }
    }
}

/// Entry of the change log kept by [`crate::FlowState`]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangeRecord {
    pub at: DateTime<Utc>,
    pub kind: ChangeKind,
}

impl ChangeRecord {
    /// Create a new record stamped with the current time
    pub fn new(kind: ChangeKind) -> Self {
        Self {
            at: Utc::now(),
            kind,
        }
    }

    /// Create a new record with a specific timestamp
    pub fn with_timestamp(at: DateTime<Utc>, kind: ChangeKind) -> Self {
        Self { at, kind }
    }
}

/// What an applied operation did
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChangeKind {
    NodesChanged { applied: usize, skipped: usize },

    EdgesChanged { applied: usize, skipped: usize },

    Connected {
        edge_id: String,
        source: String,
        target: String,
    },
}
