use serde::{Deserialize, Serialize};

/// Directed connection between two node identifiers
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Edge {
    /// Identifier, unique within the graph
    pub id: String,

    /// Node the edge starts from
    pub source: String,

    /// Node the edge points to
    pub target: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_handle: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_handle: Option<String>,

    #[serde(default)]
    pub selected: bool,
}

impl Edge {
    /// Create a new edge without handles
    pub fn new(id: impl Into<String>, source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
            target: target.into(),
            source_handle: None,
            target_handle: None,
            selected: false,
        }
    }

    /// Build the edge record for a completed connect gesture
    pub fn from_connection(id: impl Into<String>, connection: Connection) -> Self {
        Self {
            id: id.into(),
            source: connection.source,
            target: connection.target,
            source_handle: connection.source_handle,
            target_handle: connection.target_handle,
            selected: false,
        }
    }

    /// Check if this edge touches a given node
    pub fn involves(&self, node_id: &str) -> bool {
        self.source == node_id || self.target == node_id
    }

    /// Check if this edge starts from a given node
    pub fn starts_from(&self, node_id: &str) -> bool {
        self.source == node_id
    }

    /// Check if this edge ends at a given node
    pub fn ends_at(&self, node_id: &str) -> bool {
        self.target == node_id
    }

    /// Update the edge's selection state
    pub fn set_selected(&mut self, selected: bool) {
        self.selected = selected;
    }
}

/// Candidate edge produced when a drag-to-connect gesture completes
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Connection {
    pub source: String,
    pub target: String,
    #[serde(default)]
    pub source_handle: Option<String>,
    #[serde(default)]
    pub target_handle: Option<String>,
}

impl Connection {
    /// Connection between two nodes' default handles
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            source_handle: None,
            target_handle: None,
        }
    }

    /// Attach explicit handle identifiers
    pub fn with_handles(
        mut self,
        source_handle: Option<String>,
        target_handle: Option<String>,
    ) -> Self {
        self.source_handle = source_handle;
        self.target_handle = target_handle;
        self
    }

    pub fn is_self_loop(&self) -> bool {
        self.source == self.target
    }
}
