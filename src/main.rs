// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//
//! Graphreel CLI - draw weighted graphs and replay their traversals

use anyhow::Result;
use clap::{Parser, Subcommand};
use graphreel::commands::{self, traverse::Playback, Session};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "graphreel")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Quiet mode (suppress non-error output)
    #[arg(short, long)]
    quiet: bool,

    /// Configuration file path
    #[arg(short, long, env = "GRAPHREEL_CONFIG")]
    config: Option<std::path::PathBuf>,

    /// Data directory override
    #[arg(long, env = "GRAPHREEL_DATA_DIR")]
    data_dir: Option<std::path::PathBuf>,

    /// Name of the graph to operate on
    #[arg(short, long, env = "GRAPHREEL_GRAPH")]
    graph: Option<String>,

    /// Disable colored output
    #[arg(long, env = "NO_COLOR")]
    no_color: bool,

    /// Output in JSON format
    #[arg(long)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage vertices
    Vertex {
        /// Action: add, move, remove, list
        action: String,

        /// Vertex id (or label, except for add)
        id: Option<String>,

        /// Horizontal position as a fraction of the canvas width
        #[arg(long, allow_negative_numbers = true)]
        x: Option<f64>,

        /// Vertical position as a fraction of the canvas height
        #[arg(long, allow_negative_numbers = true)]
        y: Option<f64>,
    },

    /// Manage edges
    Edge {
        /// Action: add, remove, list
        action: String,

        /// Source vertex id or label
        from: Option<String>,

        /// Target vertex id or label
        to: Option<String>,
    },

    /// Traverse the graph depth first or breadth first
    Traverse {
        /// Order: df, bf
        order: String,

        /// Start vertex id or label
        start: String,

        /// Animate the steps
        #[arg(long)]
        replay: bool,

        /// Pause between steps in milliseconds
        #[arg(long)]
        timeout: Option<u64>,

        /// Shorten the pause by one step per occurrence
        #[arg(long, action = clap::ArgAction::Count)]
        faster: u8,

        /// Lengthen the pause by one step per occurrence
        #[arg(long, action = clap::ArgAction::Count)]
        slower: u8,
    },

    /// Find the shortest path between two vertices
    Path {
        /// Start vertex id or label
        from: String,

        /// End vertex id or label
        to: String,

        /// Steer the search with straight-line distance to the end
        #[arg(long)]
        heuristic: bool,

        /// Animate the steps
        #[arg(long)]
        replay: bool,

        /// Pause between steps in milliseconds
        #[arg(long)]
        timeout: Option<u64>,

        /// Shorten the pause by one step per occurrence
        #[arg(long, action = clap::ArgAction::Count)]
        faster: u8,

        /// Lengthen the pause by one step per occurrence
        #[arg(long, action = clap::ArgAction::Count)]
        slower: u8,
    },

    /// Print the current graph
    Show,

    /// Remove every vertex and edge
    Clear,

    /// List saved graphs
    Graphs,

    /// Delete a saved graph
    Delete {
        /// Graph name
        name: String,
    },

    /// Show configuration
    Config {
        /// Configuration key (omit to print everything)
        key: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = graphreel::config::load(cli.config.as_deref())?;

    // Initialize logging
    let filter = match cli.verbose {
        0 if cli.quiet => EnvFilter::new("error"),
        0 => EnvFilter::try_from_env("GRAPHREEL_LOG")
            .unwrap_or_else(|_| EnvFilter::new(&config.log_level)),
        1 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let session = Session::new(config, cli.data_dir, cli.graph, cli.json, !cli.no_color && !cli.json);

    // Execute command
    match cli.command {
        Commands::Vertex { action, id, x, y } => commands::vertex::run(&session, &action, id, x, y),
        Commands::Edge { action, from, to } => commands::edge::run(&session, &action, from, to),
        Commands::Traverse {
            order,
            start,
            replay,
            timeout,
            faster,
            slower,
        } => commands::traverse::run(
            &session,
            &order,
            &start,
            Playback {
                replay,
                timeout_ms: timeout,
                faster,
                slower,
            },
        ),
        Commands::Path {
            from,
            to,
            heuristic,
            replay,
            timeout,
            faster,
            slower,
        } => commands::traverse::run_path(
            &session,
            &from,
            &to,
            heuristic,
            Playback {
                replay,
                timeout_ms: timeout,
                faster,
                slower,
            },
        ),
        Commands::Show => commands::graphs::show(&session),
        Commands::Clear => commands::graphs::clear(&session),
        Commands::Graphs => commands::graphs::list(&session),
        Commands::Delete { name } => commands::graphs::delete(&session, &name),
        Commands::Config { key } => commands::config::run(&session, key.as_deref()),
    }
}
