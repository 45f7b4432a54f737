use serde::{Deserialize, Serialize};

/// A positioned, labelled vertex in the diagram
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Node {
    /// Identifier, unique within the graph
    pub id: String,

    /// Top-left corner on the canvas (canvas units)
    pub position: Position,

    /// Opaque payload shown by the rendering surface
    pub data: NodeData,

    /// Selection state, toggled by select changes
    #[serde(default)]
    pub selected: bool,
}

impl Node {
    /// Create a new, unselected node
    pub fn new(id: impl Into<String>, position: Position, data: NodeData) -> Self {
        Self {
            id: id.into(),
            position,
            data,
            selected: false,
        }
    }

    /// Move the node
    pub fn set_position(&mut self, position: Position) {
        self.position = position;
    }

    /// Update the node's selection state
    pub fn set_selected(&mut self, selected: bool) {
        self.selected = selected;
    }

    /// Label text, if the payload carries one
    pub fn label(&self) -> &str {
        &self.data.label
    }
}

/// Position on the canvas
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    /// Create a new position
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Offset this position by a delta
    pub fn translated(&self, dx: f32, dy: f32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

/// Payload carried by a node
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct NodeData {
    pub label: String,
}

impl NodeData {
    /// Payload with just a label
    pub fn label(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
        }
    }
}
