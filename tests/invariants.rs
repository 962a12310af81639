// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Invariant tests for the graph model
//!
//! These tests verify critical invariants:
//! 1. Structural consistency - edges, neighbor projections and weights agree
//! 2. Version accounting - one bump per applied mutation, none otherwise
//! 3. Traversal coverage - every reachable vertex is visited exactly once
//! 4. Shortest paths - costs agree with an independent implementation

use graphreel::geometry::distance;
use graphreel::graph::Graph;
use graphreel::labels::LabelCursor;
use graphreel::types::{Coordinates, Edge, VisitedItem};
use petgraph::graph::{NodeIndex, UnGraph};
use petgraph::visit::EdgeRef;
use proptest::prelude::*;
use std::collections::{HashMap, HashSet};

// =============================================================================
// Test Helpers
// =============================================================================

#[derive(Debug, Clone)]
enum Op {
    AddVertex(u8, f64, f64),
    RemoveVertex(u8),
    AddEdge(u8, u8),
    RemoveEdge(u8, u8),
    Move(u8, f64, f64),
}

fn id(index: u8) -> String {
    format!("v{index}")
}

fn op_strategy() -> impl Strategy<Value = Op> {
    let index = 0u8..8;
    let coordinate = 0.0f64..1.0;
    prop_oneof![
        3 => (index.clone(), coordinate.clone(), coordinate.clone())
            .prop_map(|(i, x, y)| Op::AddVertex(i, x, y)),
        1 => index.clone().prop_map(Op::RemoveVertex),
        4 => (index.clone(), index.clone()).prop_map(|(a, b)| Op::AddEdge(a, b)),
        1 => (index.clone(), index.clone()).prop_map(|(a, b)| Op::RemoveEdge(a, b)),
        2 => (index, coordinate.clone(), coordinate).prop_map(|(i, x, y)| Op::Move(i, x, y)),
    ]
}

/// Apply `op`; returns whether the graph reports a mutation
fn apply(graph: &mut Graph, op: &Op) -> bool {
    match op {
        Op::AddVertex(i, x, y) => graph.add_vertex(Coordinates::new(*x, *y), id(*i)),
        Op::RemoveVertex(i) => graph.remove_vertex(&id(*i)).is_ok(),
        Op::AddEdge(a, b) => {
            let before = graph.edge_count();
            graph.add_edge(&id(*a), &id(*b)).is_ok() && graph.edge_count() > before
        }
        Op::RemoveEdge(a, b) => graph.remove_edge(&Edge::between(id(*a), id(*b))).is_ok(),
        Op::Move(i, x, y) => graph.update_vertex_coordinates(Coordinates::new(*x, *y), &id(*i)),
    }
}

fn assert_invariants(graph: &Graph) {
    let ids: HashSet<&str> = graph.vertices().map(|v| v.id.as_str()).collect();

    for edge in graph.edges() {
        assert!(ids.contains(edge.from.as_str()), "dangling edge source {}", edge.from);
        assert!(ids.contains(edge.to.as_str()), "dangling edge target {}", edge.to);
        assert_ne!(edge.from, edge.to, "self loop");

        let from = graph.vertex(&edge.from).unwrap();
        let to = graph.vertex(&edge.to).unwrap();
        assert_eq!(from.neighbors.iter().filter(|n| n.id == edge.to).count(), 1);
        assert_eq!(to.neighbors.iter().filter(|n| n.id == edge.from).count(), 1);
        assert_eq!(from.neighbor(&edge.to).unwrap().weight, edge.weight);
        assert_eq!(to.neighbor(&edge.from).unwrap().weight, edge.weight);
        assert!((edge.weight - distance(from.coordinates, to.coordinates)).abs() < 1e-12);
    }

    let mut pairs = HashSet::new();
    for edge in graph.edges() {
        let pair = if edge.from < edge.to {
            (edge.from.clone(), edge.to.clone())
        } else {
            (edge.to.clone(), edge.from.clone())
        };
        assert!(pairs.insert(pair), "parallel edge {} -- {}", edge.from, edge.to);
    }

    let projections: usize = graph.vertices().map(|v| v.neighbors.len()).sum();
    assert_eq!(projections, graph.edge_count() * 2);
    for vertex in graph.vertices() {
        for neighbor in &vertex.neighbors {
            assert!(ids.contains(neighbor.id.as_str()), "dangling neighbor {}", neighbor.id);
        }
    }
}

fn build(points: &[(f64, f64)], links: &[(usize, usize)]) -> Graph {
    let mut graph = Graph::new();
    for (i, (x, y)) in points.iter().enumerate() {
        graph.add_vertex(Coordinates::new(*x, *y), format!("v{i}"));
    }
    for (a, b) in links {
        let (a, b) = (a % points.len(), b % points.len());
        graph.add_edge(&format!("v{a}"), &format!("v{b}")).unwrap();
    }
    graph
}

fn oracle(graph: &Graph) -> (UnGraph<String, f64>, HashMap<String, NodeIndex>) {
    let mut og = UnGraph::new_undirected();
    let mut indices = HashMap::new();
    for vertex in graph.vertices() {
        indices.insert(vertex.id.clone(), og.add_node(vertex.id.clone()));
    }
    for edge in graph.edges() {
        og.add_edge(indices[&edge.from], indices[&edge.to], edge.weight);
    }
    (og, indices)
}

fn assert_discovery_order(items: &[VisitedItem]) {
    let mut seen = HashSet::new();
    for (i, item) in items.iter().enumerate() {
        if i == 0 {
            assert!(item.from.is_empty());
        } else {
            assert!(seen.contains(&item.from), "{} discovered before {}", item.vertex.id, item.from);
        }
        assert!(seen.insert(item.vertex.id.clone()), "{} visited twice", item.vertex.id);
    }
}

fn graph_strategy() -> impl Strategy<Value = (Vec<(f64, f64)>, Vec<(usize, usize)>)> {
    (
        prop::collection::vec((0.0f64..1.0, 0.0f64..1.0), 1..10),
        prop::collection::vec((0usize..10, 0usize..10), 0..20),
    )
}

// =============================================================================
// Structural Invariants
// =============================================================================

proptest! {
    #[test]
    fn invariants_hold_after_every_mutation(ops in prop::collection::vec(op_strategy(), 1..60)) {
        let mut graph = Graph::new();
        for op in &ops {
            let version = graph.version();
            let mutated = apply(&mut graph, op);
            assert_invariants(&graph);
            prop_assert_eq!(graph.version(), version + u64::from(mutated), "after {:?}", op);
        }
    }

    #[test]
    fn snapshot_round_trip_preserves_structure(ops in prop::collection::vec(op_strategy(), 1..40)) {
        let mut graph = Graph::new();
        for op in &ops {
            apply(&mut graph, op);
        }
        let restored = Graph::from_json(&graph.to_json().unwrap(), LabelCursor::new()).unwrap();
        assert_invariants(&restored);
        prop_assert_eq!(restored, graph);
    }

    #[test]
    fn traversals_cover_the_component((points, links) in graph_strategy()) {
        let graph = build(&points, &links);
        let (og, indices) = oracle(&graph);

        let mut bfs = petgraph::visit::Bfs::new(&og, indices["v0"]);
        let mut reachable = HashSet::new();
        while let Some(node) = bfs.next(&og) {
            reachable.insert(og[node].clone());
        }

        for items in [graph.traverse_df("v0").unwrap(), graph.traverse_bf("v0").unwrap()] {
            assert_discovery_order(&items);
            let visited: HashSet<String> = items.iter().map(|i| i.vertex.id.clone()).collect();
            prop_assert_eq!(&visited, &reachable);
        }
    }

    #[test]
    fn dijkstra_matches_oracle((points, links) in graph_strategy()) {
        let graph = build(&points, &links);
        let (og, indices) = oracle(&graph);
        let end = format!("v{}", points.len() - 1);

        let costs = petgraph::algo::dijkstra(&og, indices["v0"], Some(indices[&end]), |e| *e.weight());
        let result = graph.dijkstra("v0", &end, false).unwrap();

        match costs.get(&indices[&end]) {
            Some(expected) => {
                prop_assert!(result.is_found());
                prop_assert_eq!(&result.path.first().unwrap().id, "v0");
                prop_assert_eq!(&result.path.last().unwrap().id, &end);
                for pair in result.path.windows(2) {
                    prop_assert!(graph.edge_between(&pair[0].id, &pair[1].id).is_some());
                }
                prop_assert!((result.cost() - expected).abs() < 1e-9);
            }
            None => prop_assert!(!result.is_found()),
        }
    }

    #[test]
    fn heuristic_path_is_a_real_walk((points, links) in graph_strategy()) {
        let graph = build(&points, &links);
        let end = format!("v{}", points.len() - 1);
        let plain = graph.dijkstra("v0", &end, false).unwrap();
        let guided = graph.dijkstra("v0", &end, true).unwrap();

        prop_assert_eq!(plain.is_found(), guided.is_found());
        for pair in guided.path.windows(2) {
            prop_assert!(graph.edge_between(&pair[0].id, &pair[1].id).is_some());
        }
        prop_assert!(guided.cost() + 1e-9 >= plain.cost());
    }
}

// =============================================================================
// Documented Examples
// =============================================================================

#[test]
fn test_duplicate_vertex_keeps_version_and_labels() {
    let mut graph = Graph::new();
    graph.add_vertex(Coordinates::new(0.0, 0.0), "a");
    let version = graph.version();

    assert!(!graph.add_vertex(Coordinates::new(0.5, 0.5), "a"));
    assert_eq!(graph.version(), version);

    graph.add_vertex(Coordinates::new(0.5, 0.5), "b");
    assert_eq!(graph.vertex("b").unwrap().label, "B");
}

#[test]
fn test_add_edge_twice_equals_once() {
    let mut once = build(&[(0.0, 0.0), (1.0, 0.0)], &[]);
    let mut twice = build(&[(0.0, 0.0), (1.0, 0.0)], &[]);

    once.add_edge("v0", "v1").unwrap();
    twice.add_edge("v0", "v1").unwrap();
    twice.add_edge("v0", "v1").unwrap();

    assert_eq!(once, twice);
    assert_eq!(once.version(), twice.version());
}

#[test]
fn test_breadth_first_example() {
    let graph = build(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0)], &[(0, 1), (1, 2)]);
    let result = graph.traverse_bf("v0").unwrap();

    let order: Vec<(&str, &str)> = result
        .iter()
        .map(|i| (i.from.as_str(), i.vertex.id.as_str()))
        .collect();
    assert_eq!(order, vec![("", "v0"), ("v0", "v1"), ("v1", "v2")]);
}

#[test]
fn test_remove_vertex_with_two_neighbors() {
    // v0 - v1 - v2, plus an unrelated v3 - v4
    let mut graph = build(
        &[(0.0, 0.0), (0.5, 0.0), (1.0, 0.0), (0.0, 1.0), (1.0, 1.0)],
        &[(0, 1), (1, 2), (3, 4)],
    );
    let untouched = graph.edge_between("v3", "v4").cloned();

    graph.remove_vertex("v1").unwrap();

    assert_eq!(graph.edge_count(), 1);
    assert_eq!(graph.edge_between("v3", "v4").cloned(), untouched);
    assert!(graph.vertex("v0").unwrap().neighbors.is_empty());
    assert!(graph.vertex("v2").unwrap().neighbors.is_empty());
    assert_invariants(&graph);
}

#[test]
fn test_heuristic_folds_into_stored_distances() {
    // v1 sits on the straight line but far from the end; v2 is a detour
    // that ends close to it. Folding the heuristic into the stored distance
    // makes the guided search prefer the detour.
    let graph = build(
        &[(0.0, 0.0), (0.1, 0.0), (0.9, 0.3), (1.0, 0.0)],
        &[(0, 1), (1, 3), (0, 2), (2, 3)],
    );
    let plain = graph.dijkstra("v0", "v3", false).unwrap();
    let guided = graph.dijkstra("v0", "v3", true).unwrap();

    let ids = |vertices: &[graphreel::types::Vertex]| {
        vertices.iter().map(|v| v.id.clone()).collect::<Vec<_>>()
    };
    assert_eq!(ids(&plain.path), vec!["v0", "v1", "v3"]);
    assert_eq!(ids(&plain.visited), vec!["v1", "v2", "v3"]);
    assert!((plain.cost() - 1.0).abs() < 1e-12);

    assert_eq!(ids(&guided.path), vec!["v0", "v2", "v3"]);
    assert_eq!(ids(&guided.visited), vec!["v1", "v2", "v3", "v3"]);
    assert!(guided.cost() > plain.cost());
}
