// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//
//! Graphreel library - draw weighted graphs and replay their traversals
//!
//! This crate provides a mutable weighted undirected graph whose edge
//! weights follow the Euclidean distance between vertex coordinates, the
//! depth-first, breadth-first and Dijkstra algorithms over it, and a timed
//! replayer that turns an ordered list of frames into a pausable animation.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod commands;
pub mod config;
pub mod error;
pub mod geometry;
pub mod graph;
pub mod labels;
pub mod queue;
pub mod replay;
pub mod store;

/// Core data types shared by the graph, its algorithms and its snapshots
pub mod types {
    use serde::{Deserialize, Serialize};

    // =========================================================================
    // Geometry
    // =========================================================================

    /// Position of a vertex as a fraction of the canvas extent
    #[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
    pub struct Coordinates {
        /// Horizontal fraction, usually in [0, 1]
        pub x: f64,
        /// Vertical fraction, usually in [0, 1]
        pub y: f64,
    }

    impl Coordinates {
        /// Build a coordinate pair
        #[must_use]
        pub const fn new(x: f64, y: f64) -> Self {
            Self { x, y }
        }

        /// Whether both components are finite
        #[must_use]
        pub fn is_finite(&self) -> bool {
            self.x.is_finite() && self.y.is_finite()
        }
    }

    // =========================================================================
    // Vertex and adjacency projection
    // =========================================================================

    /// One directed half of an edge, as cached on a vertex
    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct Neighbor {
        /// Id of the vertex on the other end
        pub id: String,
        /// Mirror of the owning edge's weight
        pub weight: f64,
    }

    /// Vertex in the graph
    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct Vertex {
        /// Caller-supplied unique identifier
        pub id: String,
        /// Display label assigned by the graph
        pub label: String,
        /// Normalized position
        pub coordinates: Coordinates,
        /// Incident edges in insertion order
        #[serde(default)]
        pub neighbors: Vec<Neighbor>,
    }

    impl Vertex {
        /// Find the neighbor entry pointing at `id`
        #[must_use]
        pub fn neighbor(&self, id: &str) -> Option<&Neighbor> {
            self.neighbors.iter().find(|n| n.id == id)
        }

        /// Whether this vertex has a neighbor entry for `id`
        #[must_use]
        pub fn is_adjacent(&self, id: &str) -> bool {
            self.neighbor(id).is_some()
        }
    }

    // =========================================================================
    // Edge
    // =========================================================================

    /// Canonical undirected edge record, stored once per vertex pair
    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct Edge {
        /// Endpoint the edge was created from
        pub from: String,
        /// Endpoint the edge was created to
        pub to: String,
        /// Euclidean distance between the endpoints at last recompute
        #[serde(default, deserialize_with = "stored_weight")]
        pub weight: f64,
    }

    /// JSON has no infinity, so an overflowing distance is written as null
    fn stored_weight<'de, D>(deserializer: D) -> Result<f64, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(f64::INFINITY))
    }

    impl Edge {
        /// Edge between two ids with no weight computed yet
        #[must_use]
        pub fn between(from: impl Into<String>, to: impl Into<String>) -> Self {
            Self {
                from: from.into(),
                to: to.into(),
                weight: 0.0,
            }
        }

        /// Whether this edge touches `id`
        #[must_use]
        pub fn touches(&self, id: &str) -> bool {
            self.from == id || self.to == id
        }

        /// Whether this edge joins `a` and `b` in either direction
        #[must_use]
        pub fn joins(&self, a: &str, b: &str) -> bool {
            (self.from == a && self.to == b) || (self.from == b && self.to == a)
        }
    }

    // =========================================================================
    // Algorithm results
    // =========================================================================

    /// A vertex paired with the id of the vertex that discovered it
    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct VisitedItem {
        /// Discovering vertex id, empty for the start vertex
        pub from: String,
        /// The discovered vertex as it was at traversal time
        pub vertex: Vertex,
    }

    /// Outcome of a shortest-path search
    #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
    pub struct ShortestPath {
        /// Vertices from start to end inclusive, empty when unreachable
        pub path: Vec<Vertex>,
        /// Vertices whose tentative distance improved, in improvement order
        pub visited: Vec<Vertex>,
    }

    impl ShortestPath {
        /// Whether a path to the end vertex was found
        #[must_use]
        pub fn is_found(&self) -> bool {
            !self.path.is_empty()
        }

        /// Sum of the edge weights along the path
        #[must_use]
        pub fn cost(&self) -> f64 {
            self.path
                .windows(2)
                .filter_map(|pair| pair[0].neighbor(&pair[1].id))
                .map(|n| n.weight)
                .sum()
        }

        /// The path as traversal steps, each discovered from its predecessor
        #[must_use]
        pub fn steps(&self) -> Vec<VisitedItem> {
            self.path
                .iter()
                .enumerate()
                .map(|(i, vertex)| VisitedItem {
                    from: i
                        .checked_sub(1)
                        .map(|prev| self.path[prev].id.clone())
                        .unwrap_or_default(),
                    vertex: vertex.clone(),
                })
                .collect()
        }
    }

    // =========================================================================
    // Snapshot
    // =========================================================================

    /// Persisted form of a vertex; neighbors are rebuilt from edges on load
    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct VertexRecord {
        /// Vertex id
        pub id: String,
        /// Display label
        pub label: String,
        /// Normalized position
        pub coordinates: Coordinates,
    }

    /// Structural snapshot of a graph
    #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct GraphSnapshot {
        /// Vertices keyed by id
        #[serde(default)]
        pub adjacency_list: std::collections::BTreeMap<String, VertexRecord>,
        /// Edge list; weights are recomputed on load
        #[serde(default)]
        pub edges: Vec<Edge>,
    }
}

/// Prelude for common imports
pub mod prelude {
    pub use crate::error::{GraphError, Result};
    pub use crate::graph::Graph;
    pub use crate::labels::LabelCursor;
    pub use crate::replay::{Frame, ReplayReport, Replayer};
    pub use crate::types::*;
}
