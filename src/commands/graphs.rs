// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Whole-graph commands - show, clear, list and delete saved graphs

use super::{label_of, Session};
use anyhow::{bail, Result};
use std::io::Write;

/// Print the selected graph
pub fn show(session: &Session) -> Result<()> {
    let graph = session.load()?;

    if session.json {
        let mut stdout = std::io::stdout().lock();
        stdout.write_all(graph.to_json()?.as_bytes())?;
        stdout.write_all(b"\n")?;
        return Ok(());
    }

    println!(
        "Graph '{}': {} vertices, {} edges",
        session.graph_name,
        graph.vertex_count(),
        graph.edge_count()
    );
    for vertex in graph.vertices() {
        let neighbors: Vec<&str> = vertex
            .neighbors
            .iter()
            .map(|n| label_of(&graph, &n.id))
            .collect();
        println!("  {} [{}] -> {}", vertex.label, vertex.id, neighbors.join(", "));
    }
    Ok(())
}

/// Remove every vertex and edge from the selected graph
pub fn clear(session: &Session) -> Result<()> {
    let mut graph = session.load()?;
    graph.clear();
    session.save(&graph)?;
    println!("Cleared graph '{}'", session.graph_name);
    Ok(())
}

/// List saved graphs
pub fn list(session: &Session) -> Result<()> {
    let names = session.store.list()?;

    if session.json {
        println!("{}", serde_json::to_string_pretty(&names)?);
        return Ok(());
    }
    if names.is_empty() {
        println!("No saved graphs in {}", session.store.dir().display());
        return Ok(());
    }
    for name in names {
        let marker = if name == session.graph_name { "*" } else { " " };
        println!("{marker} {name}");
    }
    Ok(())
}

/// Delete a saved graph
pub fn delete(session: &Session, name: &str) -> Result<()> {
    if !session.store.delete(name)? {
        bail!("No saved graph named '{}'", name);
    }
    println!("Deleted graph '{}'", name);
    Ok(())
}
