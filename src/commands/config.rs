// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell

use super::Session;
use anyhow::Result;

/// Print the effective configuration, or a single key of it
pub fn run(session: &Session, key: Option<&str>) -> Result<()> {
    let Some(key) = key else {
        print!("{}", session.config.to_toml()?);
        return Ok(());
    };

    let value = match key {
        "data_dir" => session.config.data_dir.display().to_string(),
        "replay_timeout_ms" => session.config.replay_timeout_ms.to_string(),
        "timeout_step_ms" => session.config.timeout_step_ms.to_string(),
        "log_level" => session.config.log_level.clone(),
        "default_graph" => session.config.default_graph.clone(),
        other => anyhow::bail!("Unknown configuration key: {}", other),
    };
    tracing::info!("Getting {}", key);
    println!("{value}");
    Ok(())
}
