//! Compressed sparse row adjacency over node positions.
//!
//! Node `i` is the `i`-th entry of the node collection. `row_ptr[i]..row_ptr[i + 1]`
//! indexes the slice of `col_idx` holding the neighbours of `i`.

use crate::{Edge, Node};
use std::collections::HashMap;
use thiserror::Error;

/// Which way edges are followed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// source -> target
    Forward,
    /// target -> source
    Reverse,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AdjacencyError {
    #[error("edge node id out of bounds: source={from}, target={to}, max={max}")]
    NodeOutOfBounds { from: u32, to: u32, max: i64 },

    #[error("edge {edge_id} references unknown node {node_id}")]
    DanglingEdge { edge_id: String, node_id: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Adjacency {
    row_ptr: Vec<u32>,
    col_idx: Vec<u32>,
    direction: Direction,
}

impl Adjacency {
    /// Build from `(source, target)` index pairs
    pub fn build(
        edges: &[(u32, u32)],
        node_count: u32,
        direction: Direction,
    ) -> Result<Self, AdjacencyError> {
        if let Some(&(from, to)) = edges
            .iter()
            .find(|(s, t)| *s >= node_count || *t >= node_count)
        {
            return Err(AdjacencyError::NodeOutOfBounds {
                from,
                to,
                max: node_count as i64 - 1,
            });
        }

        let n = node_count as usize;
        let oriented = |&(s, t): &(u32, u32)| match direction {
            Direction::Forward => (s, t),
            Direction::Reverse => (t, s),
        };

        // Count degrees, then turn counts into offsets
        let mut row_ptr = vec![0u32; n + 1];
        for (from, _) in edges.iter().map(oriented) {
            row_ptr[from as usize + 1] += 1;
        }
        for i in 0..n {
            row_ptr[i + 1] += row_ptr[i];
        }

        let mut col_idx = vec![0u32; edges.len()];
        let mut cursor: Vec<u32> = row_ptr[..n].to_vec();
        for (from, to) in edges.iter().map(oriented) {
            let slot = &mut cursor[from as usize];
            col_idx[*slot as usize] = to;
            *slot += 1;
        }

        Ok(Self {
            row_ptr,
            col_idx,
            direction,
        })
    }

    /// Build from the flow collections, resolving string ids to node positions
    pub fn from_flow(
        nodes: &[Node],
        edges: &[Edge],
        direction: Direction,
    ) -> Result<Self, AdjacencyError> {
        let index: HashMap<&str, u32> = nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (n.id.as_str(), i as u32))
            .collect();

        let resolve = |edge: &Edge, node_id: &str| {
            index
                .get(node_id)
                .copied()
                .ok_or_else(|| AdjacencyError::DanglingEdge {
                    edge_id: edge.id.clone(),
                    node_id: node_id.to_string(),
                })
        };

        let pairs = edges
            .iter()
            .map(|e| -> Result<(u32, u32), AdjacencyError> {
                Ok((resolve(e, &e.source)?, resolve(e, &e.target)?))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Self::build(&pairs, nodes.len() as u32, direction)
    }

    /// Neighbours of `node`; empty for an out-of-range node
    pub fn neighbors(&self, node: u32) -> &[u32] {
        let i = node as usize;
        if i + 1 >= self.row_ptr.len() {
            return &[];
        }
        let start = self.row_ptr[i] as usize;
        let end = self.row_ptr[i + 1] as usize;
        &self.col_idx[start..end]
    }

    pub fn degree(&self, node: u32) -> usize {
        self.neighbors(node).len()
    }

    pub fn row_ptr(&self) -> &[u32] {
        &self.row_ptr
    }

    pub fn col_idx(&self) -> &[u32] {
        &self.col_idx
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn node_count(&self) -> usize {
        self.row_ptr.len() - 1
    }

    pub fn edge_count(&self) -> usize {
        self.col_idx.len()
    }
}
