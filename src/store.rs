// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Named graphs kept as JSON snapshots in a data directory

use crate::graph::Graph;
use crate::labels::LabelCursor;
use anyhow::{bail, Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

const EXTENSION: &str = "json";

/// Directory of `<name>.json` graph snapshots
#[derive(Debug, Clone)]
pub struct GraphStore {
    dir: PathBuf,
}

impl GraphStore {
    /// Use `dir` as the store location; it is created on first save
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Store location
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, name: &str) -> Result<PathBuf> {
        if name.is_empty()
            || name.starts_with('.')
            || name.contains(|c: char| std::path::is_separator(c))
        {
            bail!("Invalid graph name: {:?}", name);
        }
        Ok(self.dir.join(format!("{name}.{EXTENSION}")))
    }

    /// Whether a graph called `name` has been saved
    pub fn exists(&self, name: &str) -> Result<bool> {
        Ok(self.path(name)?.exists())
    }

    /// Load `name`, or an empty graph if it was never saved
    pub fn load(&self, name: &str, labels: LabelCursor) -> Result<Graph> {
        let path = self.path(name)?;
        if !path.exists() {
            debug!(%name, "no saved graph, starting empty");
            return Ok(Graph::with_labels(labels));
        }

        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Graph::from_json(&content, labels)
            .with_context(|| format!("Failed to parse {}", path.display()))
    }

    /// Save `graph` under `name`
    pub fn save(&self, name: &str, graph: &Graph) -> Result<()> {
        let path = self.path(name)?;
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("Failed to create directory {}", self.dir.display()))?;

        let json = graph.to_json().context("Failed to serialize graph")?;
        fs::write(&path, json).with_context(|| format!("Failed to write {}", path.display()))?;
        debug!(%name, path = %path.display(), "graph saved");
        Ok(())
    }

    /// Names of all saved graphs, sorted
    pub fn list(&self) -> Result<Vec<String>> {
        if !self.dir.exists() {
            return Ok(Vec::new());
        }

        let mut names = Vec::new();
        for entry in fs::read_dir(&self.dir)
            .with_context(|| format!("Failed to read directory {}", self.dir.display()))?
        {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some(EXTENSION) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                names.push(stem.to_string());
            }
        }
        names.sort();
        Ok(names)
    }

    /// Delete `name`; returns false if it did not exist
    pub fn delete(&self, name: &str) -> Result<bool> {
        let path = self.path(name)?;
        if !path.exists() {
            return Ok(false);
        }
        fs::remove_file(&path).with_context(|| format!("Failed to delete {}", path.display()))?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Coordinates;
    use tempfile::TempDir;

    fn sample() -> Graph {
        let mut graph = Graph::new();
        graph.add_vertex(Coordinates::new(0.1, 0.1), "1");
        graph.add_vertex(Coordinates::new(0.4, 0.5), "2");
        graph.add_edge("1", "2").unwrap();
        graph
    }

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let store = GraphStore::new(dir.path().join("graphs"));
        let graph = sample();

        store.save("triangle", &graph).unwrap();
        let loaded = store.load("triangle", LabelCursor::new()).unwrap();

        assert_eq!(loaded, graph);
        assert!(store.exists("triangle").unwrap());
    }

    #[test]
    fn test_load_missing_is_empty() {
        let dir = TempDir::new().unwrap();
        let store = GraphStore::new(dir.path());
        assert!(store.load("nothing", LabelCursor::new()).unwrap().is_empty());
    }

    #[test]
    fn test_list_and_delete() {
        let dir = TempDir::new().unwrap();
        let store = GraphStore::new(dir.path());
        assert!(store.list().unwrap().is_empty());

        store.save("b", &sample()).unwrap();
        store.save("a", &sample()).unwrap();
        fs::write(dir.path().join("notes.txt"), "ignored").unwrap();
        assert_eq!(store.list().unwrap(), vec!["a", "b"]);

        assert!(store.delete("a").unwrap());
        assert!(!store.delete("a").unwrap());
        assert_eq!(store.list().unwrap(), vec!["b"]);
    }

    #[test]
    fn test_rejects_path_names() {
        let store = GraphStore::new("/tmp");
        assert!(store.save("../escape", &sample()).is_err());
        assert!(store.save("", &sample()).is_err());
    }
}
