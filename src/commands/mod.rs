// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//
//! Command implementations

pub mod config;
pub mod edge;
pub mod graphs;
pub mod replay;
pub mod traverse;
pub mod vertex;

use crate::config::Config;
use crate::graph::Graph;
use crate::labels::LabelCursor;
use crate::store::GraphStore;
use anyhow::{Context, Result};
use std::path::PathBuf;

/// Everything a command needs: settings, the store and the selected graph
#[derive(Debug, Clone)]
pub struct Session {
    /// Effective configuration
    pub config: Config,
    /// Where graphs are saved
    pub store: GraphStore,
    /// Graph the command operates on
    pub graph_name: String,
    /// Emit JSON instead of text
    pub json: bool,
    /// Colorize text output
    pub color: bool,
    labels: LabelCursor,
}

impl Session {
    /// Build a session, letting explicit overrides win over `config`
    #[must_use]
    pub fn new(
        mut config: Config,
        data_dir: Option<PathBuf>,
        graph: Option<String>,
        json: bool,
        color: bool,
    ) -> Self {
        if let Some(dir) = data_dir {
            config.data_dir = dir;
        }
        let graph_name = graph.unwrap_or_else(|| config.default_graph.clone());
        Self {
            store: GraphStore::new(config.data_dir.clone()),
            config,
            graph_name,
            json,
            color,
            labels: LabelCursor::new(),
        }
    }

    /// Load the selected graph
    pub fn load(&self) -> Result<Graph> {
        self.store
            .load(&self.graph_name, self.labels.clone())
            .with_context(|| format!("Failed to load graph '{}'", self.graph_name))
    }

    /// Save the selected graph
    pub fn save(&self, graph: &Graph) -> Result<()> {
        self.store.save(&self.graph_name, graph)
    }
}

/// Resolve a vertex id or display label to an id
pub fn resolve_vertex(graph: &Graph, id_or_label: &str) -> Result<String> {
    if graph.contains(id_or_label) {
        return Ok(id_or_label.to_string());
    }
    graph
        .vertex_by_label(id_or_label)
        .map(|v| v.id.clone())
        .ok_or_else(|| anyhow::anyhow!("No vertex found matching: {}", id_or_label))
}

/// Display label for `id`, falling back to the id itself
#[must_use]
pub fn label_of<'a>(graph: &'a Graph, id: &'a str) -> &'a str {
    graph.vertex(id).map_or(id, |v| v.label.as_str())
}
