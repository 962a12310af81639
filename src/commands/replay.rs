// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Terminal playback of traversal results

use crate::commands::label_of;
use crate::graph::Graph;
use crate::replay::{Frame, Replayer};
use crate::types::VisitedItem;
use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use std::time::Duration;
use tracing::info;

/// One printed line of a playback
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    /// Label of the visited vertex
    pub label: String,
    /// Label of the vertex it was reached from
    pub from: Option<String>,
}

/// Turn traversal items into printable steps
#[must_use]
pub fn steps(graph: &Graph, items: &[VisitedItem]) -> Vec<Step> {
    items
        .iter()
        .map(|item| Step {
            label: item.vertex.label.clone(),
            from: (!item.from.is_empty()).then(|| label_of(graph, &item.from).to_string()),
        })
        .collect()
}

fn render(index: usize, step: &Step, color: bool) -> String {
    let label = if color {
        step.label.green().bold().to_string()
    } else {
        step.label.clone()
    };
    match &step.from {
        Some(from) if color => format!("  {:>3}. {}  {}", index + 1, label, format!("<- {from}").dimmed()),
        Some(from) => format!("  {:>3}. {}  <- {}", index + 1, label, from),
        None => format!("  {:>3}. {}", index + 1, label),
    }
}

/// Print `steps` one frame at a time, `timeout` apart
///
/// Ctrl-C resets the replayer and stops early. Returns the number of frames
/// shown.
pub fn run(steps: Vec<Step>, timeout: Duration, color: bool) -> Result<usize> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to start replay runtime")?;

    let shown = runtime.block_on(async move {
        let replayer = Replayer::new(timeout)
            .on_ready(|report| info!(operations = report.operations, "replay done"));

        for (index, step) in steps.into_iter().enumerate() {
            replayer.add(Frame::new(move || println!("{}", render(index, &step, color))));
        }
        replayer.ready();

        tokio::select! {
            () = replayer.play() => {}
            _ = tokio::signal::ctrl_c() => {
                replayer.reset();
                eprintln!("Replay interrupted");
            }
        }

        replayer.operations()
    });
    Ok(shown)
}
