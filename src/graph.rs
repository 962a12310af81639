// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Weighted undirected graph and the algorithms it exposes

use crate::error::{GraphError, Result};
use crate::geometry::distance;
use crate::labels::LabelCursor;
use crate::queue::PriorityQueue;
use crate::types::{
    Coordinates, Edge, GraphSnapshot, Neighbor, ShortestPath, Vertex, VertexRecord, VisitedItem,
};
use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};
use std::fmt;
use tracing::{debug, trace};

/// Callback notified with the new version after every mutation
pub type VersionObserver = Box<dyn FnMut(u64) + Send>;

/// Graph whose edge weights follow the distance between their endpoints
pub struct Graph {
    /// Adjacency list keyed by vertex id
    vertices: BTreeMap<String, Vertex>,
    /// Canonical edge records, one per vertex pair
    edges: Vec<Edge>,
    /// Source of vertex labels
    labels: LabelCursor,
    /// Mutation counter
    version: u64,
    /// Change notification hook
    observer: Option<VersionObserver>,
}

impl Default for Graph {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Graph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Graph")
            .field("vertices", &self.vertices)
            .field("edges", &self.edges)
            .field("version", &self.version)
            .field("observed", &self.observer.is_some())
            .finish_non_exhaustive()
    }
}

impl PartialEq for Graph {
    fn eq(&self, other: &Self) -> bool {
        fn neighbor_set(vertex: &Vertex) -> Vec<(&str, f64)> {
            let mut set: Vec<_> = vertex
                .neighbors
                .iter()
                .map(|n| (n.id.as_str(), n.weight))
                .collect();
            set.sort_by(|a, b| a.0.cmp(b.0));
            set
        }

        fn edge_set(edges: &[Edge]) -> Vec<(&str, &str, f64)> {
            let mut set: Vec<_> = edges
                .iter()
                .map(|e| {
                    let (a, b) = if e.from <= e.to { (&e.from, &e.to) } else { (&e.to, &e.from) };
                    (a.as_str(), b.as_str(), e.weight)
                })
                .collect();
            set.sort_by(|x, y| (x.0, x.1).cmp(&(y.0, y.1)));
            set
        }

        self.vertices.len() == other.vertices.len()
            && self.vertices.iter().all(|(id, v)| {
                other.vertices.get(id).is_some_and(|o| {
                    v.label == o.label
                        && v.coordinates == o.coordinates
                        && neighbor_set(v) == neighbor_set(o)
                })
            })
            && edge_set(&self.edges) == edge_set(&other.edges)
    }
}

impl Graph {
    /// Create an empty graph with its own label sequence
    #[must_use]
    pub fn new() -> Self {
        Self::with_labels(LabelCursor::new())
    }

    /// Create an empty graph drawing labels from `labels`
    #[must_use]
    pub fn with_labels(labels: LabelCursor) -> Self {
        Self {
            vertices: BTreeMap::new(),
            edges: Vec::new(),
            labels,
            version: 0,
            observer: None,
        }
    }

    /// Register the observer called after every mutation
    pub fn on_version_change(&mut self, observer: impl FnMut(u64) + Send + 'static) {
        self.observer = Some(Box::new(observer));
    }

    /// Current mutation counter
    #[must_use]
    pub fn version(&self) -> u64 {
        self.version
    }

    /// The label sequence this graph draws from
    #[must_use]
    pub fn labels(&self) -> &LabelCursor {
        &self.labels
    }

    fn bump_version(&mut self) {
        self.version += 1;
        debug!(version = self.version, "graph changed");
        if let Some(observer) = self.observer.as_mut() {
            observer(self.version);
        }
    }

    // =========================================================================
    // Mutation
    // =========================================================================

    /// Add a vertex
    ///
    /// Returns false if `id` is already taken or a coordinate is NaN or
    /// infinite.
    pub fn add_vertex(&mut self, coordinates: Coordinates, id: impl Into<String>) -> bool {
        let id = id.into();
        if !coordinates.is_finite() {
            trace!(%id, "rejecting non-finite coordinates");
            return false;
        }
        if self.vertices.contains_key(&id) {
            trace!(%id, "vertex already present");
            return false;
        }

        let label = self.labels.allocate();
        debug!(%id, %label, "adding vertex");
        self.vertices.insert(
            id.clone(),
            Vertex {
                id,
                label,
                coordinates,
                neighbors: Vec::new(),
            },
        );
        self.bump_version();
        true
    }

    /// Remove a vertex together with every edge touching it
    pub fn remove_vertex(&mut self, id: &str) -> Result<()> {
        let vertex = self
            .vertices
            .remove(id)
            .ok_or_else(|| GraphError::VertexNotFound(id.to_string()))?;

        let before = self.edges.len();
        self.edges.retain(|e| !e.touches(id));
        debug!(%id, edges = before - self.edges.len(), "removing vertex");

        for neighbor in &vertex.neighbors {
            if let Some(other) = self.vertices.get_mut(&neighbor.id) {
                other.neighbors.retain(|n| n.id != id);
            }
        }

        self.bump_version();
        Ok(())
    }

    /// Move a vertex and recompute the weights of its edges
    ///
    /// Returns false if `id` is not in the graph or a coordinate is NaN or
    /// infinite.
    pub fn update_vertex_coordinates(&mut self, coordinates: Coordinates, id: &str) -> bool {
        if !coordinates.is_finite() {
            return false;
        }
        match self.vertices.get_mut(id) {
            Some(vertex) => vertex.coordinates = coordinates,
            None => return false,
        }

        let incident: Vec<(usize, String)> = self
            .edges
            .iter()
            .enumerate()
            .filter(|(_, e)| e.touches(id))
            .map(|(i, e)| (i, if e.from == id { e.to.clone() } else { e.from.clone() }))
            .collect();

        for (index, other) in incident {
            let Some(other_coordinates) = self.vertices.get(&other).map(|v| v.coordinates) else {
                continue;
            };
            let weight = distance(coordinates, other_coordinates);
            self.edges[index].weight = weight;
            self.set_neighbor_weight(id, &other, weight);
            self.set_neighbor_weight(&other, id, weight);
        }

        self.bump_version();
        true
    }

    fn set_neighbor_weight(&mut self, owner: &str, neighbor: &str, weight: f64) {
        if let Some(vertex) = self.vertices.get_mut(owner) {
            for n in vertex.neighbors.iter_mut().filter(|n| n.id == neighbor) {
                n.weight = weight;
            }
        }
    }

    /// Connect two vertices
    ///
    /// Connecting an already connected pair, or a vertex to itself, does
    /// nothing.
    pub fn add_edge(&mut self, from_id: &str, to_id: &str) -> Result<()> {
        if self.link(from_id, to_id)? {
            self.bump_version();
        }
        Ok(())
    }

    /// Insert both directions of an edge; true when a new edge was committed
    fn link(&mut self, from_id: &str, to_id: &str) -> Result<bool> {
        let (Some(from), Some(to)) = (self.vertices.get(from_id), self.vertices.get(to_id)) else {
            return Err(GraphError::endpoint(from_id, to_id));
        };
        if from_id == to_id {
            trace!(id = %from_id, "ignoring self loop");
            return Ok(false);
        }

        let weight = distance(from.coordinates, to.coordinates);
        let mut inserted = 0;

        for (owner, other) in [(from_id, to_id), (to_id, from_id)] {
            if let Some(vertex) = self.vertices.get_mut(owner) {
                if !vertex.is_adjacent(other) {
                    vertex.neighbors.push(Neighbor {
                        id: other.to_string(),
                        weight,
                    });
                    inserted += 1;
                }
            }
        }

        if inserted < 2 {
            trace!(from = %from_id, to = %to_id, "edge already present");
            return Ok(false);
        }

        debug!(from = %from_id, to = %to_id, weight, "adding edge");
        self.edges.push(Edge {
            from: from_id.to_string(),
            to: to_id.to_string(),
            weight,
        });
        Ok(true)
    }

    /// Disconnect the endpoints of `edge`
    ///
    /// Both endpoints must exist. The pair is matched in either direction,
    /// and removing an edge that is not there is silent.
    pub fn remove_edge(&mut self, edge: &Edge) -> Result<()> {
        let (from, to) = (edge.from.as_str(), edge.to.as_str());
        if !self.vertices.contains_key(from) || !self.vertices.contains_key(to) {
            return Err(GraphError::endpoint(from, to));
        }

        debug!(%from, %to, "removing edge");
        self.edges.retain(|e| !e.joins(from, to));

        if let Some(vertex) = self.vertices.get_mut(from) {
            vertex.neighbors.retain(|n| n.id != to);
        }
        if let Some(vertex) = self.vertices.get_mut(to) {
            vertex.neighbors.retain(|n| n.id != from);
        }

        self.bump_version();
        Ok(())
    }

    /// Drop every vertex and edge and rewind the label sequence
    pub fn clear(&mut self) {
        self.vertices.clear();
        self.edges.clear();
        self.labels.reset();
        self.bump_version();
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Get a vertex by id
    #[must_use]
    pub fn vertex(&self, id: &str) -> Option<&Vertex> {
        self.vertices.get(id)
    }

    /// Whether `id` is in the graph
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.vertices.contains_key(id)
    }

    /// All vertices, ordered by id
    pub fn vertices(&self) -> impl Iterator<Item = &Vertex> {
        self.vertices.values()
    }

    /// Find a vertex by its display label
    #[must_use]
    pub fn vertex_by_label(&self, label: &str) -> Option<&Vertex> {
        self.vertices.values().find(|v| v.label == label)
    }

    /// All edges in creation order
    #[must_use]
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Find the edge joining two vertices, in either direction
    #[must_use]
    pub fn edge_between(&self, a: &str, b: &str) -> Option<&Edge> {
        self.edges.iter().find(|e| e.joins(a, b))
    }

    /// Get vertex count
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Get edge count
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Check if the graph is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    fn require(&self, id: &str) -> Result<&Vertex> {
        self.vertices
            .get(id)
            .ok_or_else(|| GraphError::VertexNotFound(id.to_string()))
    }

    // =========================================================================
    // Traversal
    // =========================================================================

    /// Depth-first pre-order traversal from `start_id`
    ///
    /// Equivalent to the recursive formulation: neighbors are explored in
    /// stored order and a vertex is attributed to whichever vertex reaches
    /// it first. An explicit stack keeps deep graphs off the call stack.
    pub fn traverse_df(&self, start_id: &str) -> Result<Vec<VisitedItem>> {
        let start = self.require(start_id)?;
        let mut visited: HashSet<&str> = HashSet::new();
        let mut result = Vec::new();
        let mut stack: Vec<(&Vertex, &str)> = vec![(start, "")];

        while let Some((vertex, from)) = stack.pop() {
            if !visited.insert(vertex.id.as_str()) {
                continue;
            }
            result.push(VisitedItem {
                from: from.to_string(),
                vertex: vertex.clone(),
            });
            for neighbor in vertex.neighbors.iter().rev() {
                if let Some(next) = self.vertices.get(&neighbor.id) {
                    stack.push((next, vertex.id.as_str()));
                }
            }
        }

        trace!(start = %start_id, visited = result.len(), "depth-first traversal");
        Ok(result)
    }

    /// Breadth-first traversal from `start_id`
    pub fn traverse_bf(&self, start_id: &str) -> Result<Vec<VisitedItem>> {
        let start = self.require(start_id)?;
        let mut visited: HashSet<&str> = HashSet::new();
        let mut result = Vec::new();
        let mut queue: VecDeque<(&Vertex, &str)> = VecDeque::from([(start, "")]);

        while let Some((vertex, from)) = queue.pop_front() {
            if !visited.insert(vertex.id.as_str()) {
                continue;
            }
            result.push(VisitedItem {
                from: from.to_string(),
                vertex: vertex.clone(),
            });
            for neighbor in &vertex.neighbors {
                if visited.contains(neighbor.id.as_str()) {
                    continue;
                }
                if let Some(next) = self.vertices.get(&neighbor.id) {
                    queue.push_back((next, vertex.id.as_str()));
                }
            }
        }

        trace!(start = %start_id, visited = result.len(), "breadth-first traversal");
        Ok(result)
    }

    /// Shortest path from `start_id` to `end_id`
    ///
    /// With `use_heuristic`, the straight-line distance from each relaxed
    /// neighbor to the end vertex is added into the candidate distance
    /// itself, so the accumulated distances carry earlier heuristic terms.
    /// This steers the search towards the end like A* but is not the
    /// textbook formulation and may settle on a longer path.
    pub fn dijkstra(&self, start_id: &str, end_id: &str, use_heuristic: bool) -> Result<ShortestPath> {
        self.require(start_id)?;
        let end = self.require(end_id)?;

        let mut distances: HashMap<&str, f64> = self
            .vertices
            .keys()
            .map(|id| (id.as_str(), f64::INFINITY))
            .collect();
        let mut previous: HashMap<&str, &str> = HashMap::new();
        let mut visited = Vec::new();
        let mut queue = PriorityQueue::new();

        distances.insert(start_id, 0.0);
        queue.push(start_id, 0.0);

        while let Some((current_id, _)) = queue.pop() {
            if current_id == end_id {
                let path = self.walk_back(start_id, end_id, &previous);
                debug!(start = %start_id, end = %end_id, hops = path.len(), "path found");
                return Ok(ShortestPath { path, visited });
            }

            let Some(current) = self.vertices.get(current_id) else {
                continue;
            };
            let current_distance = distances.get(current_id).copied().unwrap_or(f64::INFINITY);

            for neighbor in &current.neighbors {
                let Some(next) = self.vertices.get(&neighbor.id) else {
                    continue;
                };
                let heuristic = if use_heuristic {
                    distance(next.coordinates, end.coordinates)
                } else {
                    0.0
                };
                let candidate = current_distance + neighbor.weight + heuristic;
                let known = distances.get(next.id.as_str()).copied().unwrap_or(f64::INFINITY);

                if candidate < known {
                    visited.push(next.clone());
                    distances.insert(next.id.as_str(), candidate);
                    previous.insert(next.id.as_str(), current_id);
                    queue.push(next.id.as_str(), candidate);
                }
            }
        }

        debug!(start = %start_id, end = %end_id, "end vertex unreachable");
        Ok(ShortestPath {
            path: Vec::new(),
            visited,
        })
    }

    fn walk_back(&self, start_id: &str, end_id: &str, previous: &HashMap<&str, &str>) -> Vec<Vertex> {
        let mut path = Vec::new();
        let mut cursor = Some(end_id);

        while let Some(id) = cursor {
            if let Some(vertex) = self.vertices.get(id) {
                path.push(vertex.clone());
            }
            if id == start_id || path.len() > self.vertices.len() {
                break;
            }
            cursor = previous.get(id).copied();
        }

        path.reverse();
        path
    }

    // =========================================================================
    // Snapshot
    // =========================================================================

    /// Structural snapshot of vertices and edges
    #[must_use]
    pub fn to_snapshot(&self) -> GraphSnapshot {
        GraphSnapshot {
            adjacency_list: self
                .vertices
                .iter()
                .map(|(id, v)| {
                    (
                        id.clone(),
                        VertexRecord {
                            id: v.id.clone(),
                            label: v.label.clone(),
                            coordinates: v.coordinates,
                        },
                    )
                })
                .collect(),
            edges: self.edges.clone(),
        }
    }

    /// Rebuild a graph from a snapshot
    ///
    /// Neighbor lists and weights are derived from the edge list. The label
    /// cursor is moved past every label in the snapshot.
    pub fn from_snapshot(snapshot: GraphSnapshot, labels: LabelCursor) -> Result<Self> {
        let mut graph = Self::with_labels(labels);

        for (key, record) in snapshot.adjacency_list {
            graph.labels.advance_past(&record.label);
            // The record's own id wins over its map key
            let id = if record.id.is_empty() { key } else { record.id };
            graph.vertices.insert(
                id.clone(),
                Vertex {
                    id,
                    label: record.label,
                    coordinates: record.coordinates,
                    neighbors: Vec::new(),
                },
            );
        }

        for edge in &snapshot.edges {
            graph.link(&edge.from, &edge.to)?;
        }

        debug!(
            vertices = graph.vertex_count(),
            edges = graph.edge_count(),
            "graph restored from snapshot"
        );
        Ok(graph)
    }

    /// Export to JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.to_snapshot())?)
    }

    /// Import from JSON
    pub fn from_json(data: &str, labels: LabelCursor) -> Result<Self> {
        let snapshot: GraphSnapshot = serde_json::from_str(data)?;
        Self::from_snapshot(snapshot, labels)
    }
}
