// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Traversal and shortest-path commands

use super::{label_of, replay, resolve_vertex, Session};
use crate::config::Config;
use crate::types::{Vertex, VisitedItem};
use anyhow::{bail, Result};
use serde::Serialize;
use std::time::Duration;
use tracing::info;

/// Traversal orders
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Order {
    /// Depth first
    DepthFirst,
    /// Breadth first
    BreadthFirst,
}

impl Order {
    /// Parse order from string
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "df" | "dfs" | "depth" => Some(Self::DepthFirst),
            "bf" | "bfs" | "breadth" => Some(Self::BreadthFirst),
            _ => None,
        }
    }

    /// Human-readable name
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::DepthFirst => "Depth first",
            Self::BreadthFirst => "Breadth first",
        }
    }
}

/// A finished run, ready for display
#[derive(Debug, Clone, Serialize)]
pub struct TraversalResult {
    /// Title such as "Breadth first from A"
    pub label: String,
    /// Steps in replay order
    pub list: Vec<VisitedItem>,
    /// Vertices evaluated by a shortest-path search
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visited: Option<Vec<Vertex>>,
    /// Path cost for a shortest-path search
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cost: Option<f64>,
}

/// Options shared by traversal commands
#[derive(Debug, Clone, Copy, Default)]
pub struct Playback {
    /// Animate the result instead of printing it at once
    pub replay: bool,
    /// Pause override in milliseconds
    pub timeout_ms: Option<u64>,
    /// Steps of `timeout_step_ms` taken off the pause
    pub faster: u8,
    /// Steps of `timeout_step_ms` added to the pause
    pub slower: u8,
}

impl Playback {
    /// Pause between frames; zero unless replaying
    #[must_use]
    pub fn timeout(&self, config: &Config) -> Duration {
        if !self.replay {
            return Duration::ZERO;
        }
        let step = Duration::from_millis(config.timeout_step_ms);
        self.timeout_ms
            .map_or_else(|| config.replay_timeout(), Duration::from_millis)
            .saturating_add(step.saturating_mul(u32::from(self.slower)))
            .saturating_sub(step.saturating_mul(u32::from(self.faster)))
    }
}

/// Run a depth-first or breadth-first traversal
pub fn run(session: &Session, order: &str, start: &str, playback: Playback) -> Result<()> {
    let order = Order::parse(order)
        .ok_or_else(|| anyhow::anyhow!("Unknown traversal: {}. Valid: df, bf", order))?;
    let graph = session.load()?;
    let start = resolve_vertex(&graph, start)?;

    let list = match order {
        Order::DepthFirst => graph.traverse_df(&start)?,
        Order::BreadthFirst => graph.traverse_bf(&start)?,
    };
    info!(order = order.name(), %start, visited = list.len(), "traversal complete");

    let result = TraversalResult {
        label: format!("{} from {}", order.name(), label_of(&graph, &start)),
        list,
        visited: None,
        cost: None,
    };
    show(session, &graph, &result, playback)
}

/// Run Dijkstra between two vertices
pub fn run_path(
    session: &Session,
    from: &str,
    to: &str,
    heuristic: bool,
    playback: Playback,
) -> Result<()> {
    let graph = session.load()?;
    let from = resolve_vertex(&graph, from)?;
    let to = resolve_vertex(&graph, to)?;

    let found = graph.dijkstra(&from, &to, heuristic)?;
    if !found.is_found() && !session.json {
        bail!(
            "No path from {} to {}",
            label_of(&graph, &from),
            label_of(&graph, &to)
        );
    }
    info!(%from, %to, heuristic, hops = found.path.len(), "shortest path complete");

    let result = TraversalResult {
        label: format!(
            "Dijkstra{} from {} to {}",
            if heuristic { " (heuristic)" } else { "" },
            label_of(&graph, &from),
            label_of(&graph, &to)
        ),
        list: found.steps(),
        cost: found.is_found().then(|| found.cost()),
        visited: Some(found.visited),
    };
    show(session, &graph, &result, playback)
}

fn show(
    session: &Session,
    graph: &crate::graph::Graph,
    result: &TraversalResult,
    playback: Playback,
) -> Result<()> {
    if session.json {
        println!("{}", serde_json::to_string_pretty(result)?);
        return Ok(());
    }

    println!("{}", result.label);
    let timeout = playback.timeout(&session.config);
    replay::run(replay::steps(graph, &result.list), timeout, session.color)?;

    if let Some(cost) = result.cost {
        println!("cost: {cost:.4}");
    }
    if let Some(visited) = &result.visited {
        let labels: Vec<&str> = visited.iter().map(|v| v.label.as_str()).collect();
        println!("evaluated: {}", labels.join(", "));
    }
    Ok(())
}
