// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Vertex management commands - place, move and delete vertices

use super::{resolve_vertex, Session};
use crate::graph::Graph;
use crate::types::Coordinates;
use anyhow::{bail, Result};
use chrono::Utc;
use tracing::info;

/// Run vertex command
pub fn run(
    session: &Session,
    action: &str,
    id: Option<String>,
    x: Option<f64>,
    y: Option<f64>,
) -> Result<()> {
    let mut graph = session.load()?;

    match action {
        "add" | "create" => {
            let coordinates = coordinates(x, y)?;
            let id = id.unwrap_or_else(|| fresh_id(&graph, Utc::now().timestamp_millis()));

            if !graph.add_vertex(coordinates, id.as_str()) {
                bail!("Vertex already exists: {}", id);
            }
            session.save(&graph)?;

            let label = graph.vertex(&id).map(|v| v.label.as_str()).unwrap_or_default();
            info!(%id, %label, "vertex added");
            println!("Added vertex {} ({}) at ({}, {})", label, id, coordinates.x, coordinates.y);
        }

        "move" | "update" => {
            let target = id.ok_or_else(|| anyhow::anyhow!("vertex id or label is required"))?;
            let target = resolve_vertex(&graph, &target)?;
            let coordinates = coordinates(x, y)?;

            if !graph.update_vertex_coordinates(coordinates, &target) {
                bail!("Vertex not found: {}", target);
            }
            session.save(&graph)?;
            println!("Moved {} to ({}, {})", target, coordinates.x, coordinates.y);
        }

        "remove" | "delete" | "rm" => {
            let target = id.ok_or_else(|| anyhow::anyhow!("vertex id or label is required"))?;
            let target = resolve_vertex(&graph, &target)?;

            graph.remove_vertex(&target)?;
            session.save(&graph)?;
            println!("Removed vertex {}", target);
        }

        "list" | "ls" => {
            if session.json {
                let vertices: Vec<_> = graph.vertices().collect();
                println!("{}", serde_json::to_string_pretty(&vertices)?);
                return Ok(());
            }
            if graph.is_empty() {
                println!("No vertices. Use 'graphreel vertex add' to create one.");
                return Ok(());
            }
            println!("Vertices ({}):", graph.vertex_count());
            for vertex in graph.vertices() {
                println!(
                    "  {} {} ({:.3}, {:.3}) degree {}",
                    vertex.label,
                    vertex.id,
                    vertex.coordinates.x,
                    vertex.coordinates.y,
                    vertex.neighbors.len()
                );
            }
        }

        other => {
            bail!("Unknown action: {}. Valid: add, move, remove, list", other);
        }
    }

    Ok(())
}

fn coordinates(x: Option<f64>, y: Option<f64>) -> Result<Coordinates> {
    match (x, y) {
        (Some(x), Some(y)) if x.is_finite() && y.is_finite() => Ok(Coordinates::new(x, y)),
        (Some(_), Some(_)) => bail!("Coordinates must be finite numbers"),
        _ => bail!("--x and --y are required"),
    }
}

/// Milliseconds since the epoch, suffixed when that id is already taken
fn fresh_id(graph: &Graph, millis: i64) -> String {
    let base = millis.to_string();
    if !graph.contains(&base) {
        return base;
    }
    (1u64..)
        .map(|n| format!("{base}-{n}"))
        .find(|id| !graph.contains(id))
        .unwrap_or(base)
}
