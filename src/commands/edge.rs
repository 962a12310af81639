// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Edge management commands - connect and disconnect vertices

use super::{label_of, resolve_vertex, Session};
use crate::types::Edge;
use anyhow::{Context, Result};

/// Run edge command
pub fn run(session: &Session, action: &str, from: Option<String>, to: Option<String>) -> Result<()> {
    let mut graph = session.load()?;

    match action {
        "add" | "create" => {
            let (from_id, to_id) = endpoints(&graph, from, to)?;
            let before = graph.edge_count();

            graph
                .add_edge(&from_id, &to_id)
                .with_context(|| format!("Can't add edge {} -> {}", from_id, to_id))?;

            if graph.edge_count() == before {
                println!("Already connected: {} -- {}", from_id, to_id);
                return Ok(());
            }
            session.save(&graph)?;

            let weight = graph.edge_between(&from_id, &to_id).map_or(0.0, |e| e.weight);
            println!(
                "Created edge: {} -- {} (weight {:.4})",
                label_of(&graph, &from_id),
                label_of(&graph, &to_id),
                weight
            );
        }

        "remove" | "delete" | "rm" => {
            let (from_id, to_id) = endpoints(&graph, from, to)?;
            let before = graph.edge_count();

            graph
                .remove_edge(&Edge::between(from_id.as_str(), to_id.as_str()))
                .with_context(|| format!("Can't remove edge {} -> {}", from_id, to_id))?;

            if graph.edge_count() < before {
                session.save(&graph)?;
                println!("Removed edge {} -- {}", from_id, to_id);
            } else {
                println!("No edge found between {} and {}", from_id, to_id);
            }
        }

        "list" | "ls" => {
            if session.json {
                println!("{}", serde_json::to_string_pretty(graph.edges())?);
                return Ok(());
            }
            if graph.edges().is_empty() {
                println!("No edges defined. Use 'graphreel edge add' to create one.");
                return Ok(());
            }

            println!("Edges ({}):", graph.edge_count());
            for edge in graph.edges() {
                println!(
                    "  {} -- {} ({:.4})",
                    label_of(&graph, &edge.from),
                    label_of(&graph, &edge.to),
                    edge.weight
                );
            }
        }

        other => {
            anyhow::bail!("Unknown action: {}. Valid: add, remove, list", other);
        }
    }

    Ok(())
}

fn endpoints(
    graph: &crate::graph::Graph,
    from: Option<String>,
    to: Option<String>,
) -> Result<(String, String)> {
    let from = from.ok_or_else(|| anyhow::anyhow!("source vertex is required"))?;
    let to = to.ok_or_else(|| anyhow::anyhow!("target vertex is required"))?;
    Ok((resolve_vertex(graph, &from)?, resolve_vertex(graph, &to)?))
}
