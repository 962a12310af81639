// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2026 Jonathan D.A. Jewell
//! Arbitrary mutation sequences followed by every algorithm

#![no_main]

use arbitrary::Arbitrary;
use graphreel::graph::Graph;
use graphreel::types::{Coordinates, Edge};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
enum Op {
    AddVertex { id: u8, x: f64, y: f64 },
    RemoveVertex { id: u8 },
    AddEdge { from: u8, to: u8 },
    RemoveEdge { from: u8, to: u8 },
    Move { id: u8, x: f64, y: f64 },
    Search { from: u8, to: u8, heuristic: bool },
}

fn id(n: u8) -> String {
    format!("v{}", n % 16)
}

fuzz_target!(|ops: Vec<Op>| {
    let mut graph = Graph::new();
    for op in ops {
        match op {
            Op::AddVertex { id: n, x, y } => {
                let _ = graph.add_vertex(Coordinates::new(x, y), id(n));
            }
            Op::RemoveVertex { id: n } => {
                let _ = graph.remove_vertex(&id(n));
            }
            Op::AddEdge { from, to } => {
                let _ = graph.add_edge(&id(from), &id(to));
            }
            Op::RemoveEdge { from, to } => {
                let _ = graph.remove_edge(&Edge::between(id(from), id(to)));
            }
            Op::Move { id: n, x, y } => {
                let _ = graph.update_vertex_coordinates(Coordinates::new(x, y), &id(n));
            }
            Op::Search { from, to, heuristic } => {
                let _ = graph.traverse_df(&id(from));
                let _ = graph.traverse_bf(&id(from));
                let _ = graph.dijkstra(&id(from), &id(to), heuristic);
            }
        }

        let projections: usize = graph.vertices().map(|v| v.neighbors.len()).sum();
        assert_eq!(projections, graph.edge_count() * 2);
    }
});
