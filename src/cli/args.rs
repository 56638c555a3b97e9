//! CLI argument parsing using clap.
//!
//! Contains the Cli struct and the Commands enum.

use clap::{
    Parser, Subcommand, ValueEnum,
    builder::styling::{AnsiColor, Effects, Styles},
};
use std::path::PathBuf;

use crate::types::TargetKind;

fn clap_cargo_style() -> Styles {
    Styles::styled()
        .header(AnsiColor::Cyan.on_default() | Effects::BOLD)
        .usage(AnsiColor::Cyan.on_default() | Effects::BOLD)
        .literal(AnsiColor::Green.on_default())
        .placeholder(AnsiColor::Green.on_default())
}

/// Quick Start block shown after the generated help.
fn quick_start() -> String {
    use console::style;

    let heading = if console::colors_enabled() {
        style("Quick Start:").cyan().bold().to_string()
    } else {
        "Quick Start:".to_string()
    };

    let mut help = format!("{heading}\n");
    help.push_str("  $ codevision init                    # Create .codevision/settings.toml\n");
    help.push_str("  $ codevision index ./src             # Scan C# sources into the index\n");
    help.push_str("  $ codevision retrieve ProcessOrder   # Source and related symbols\n");
    help.push_str("  $ codevision complexity OrderService --kind class\n");
    help.push_str("  $ codevision graph --format dot > deps.dot\n");
    help
}

#[derive(Parser)]
#[command(
    name = "codevision",
    version = env!("CARGO_PKG_VERSION"),
    about = "Static analysis of C# source trees",
    long_about = "Index C# sources, then query call relationships, complexity and dependencies.",
    next_line_help = true,
    styles = clap_cargo_style(),
    after_help = quick_start()
)]
pub struct Cli {
    /// Path to custom settings.toml file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Rendering of the dependency graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum GraphFormat {
    /// One `file -> dependency` line per edge
    Edges,
    /// Graphviz DOT
    Dot,
    /// `{ "nodes": [...], "edges": [...] }`
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Set up .codevision directory with default configuration")]
    Init {
        /// Overwrite an existing configuration
        #[arg(short, long)]
        force: bool,
    },

    #[command(about = "Display active settings")]
    Config,

    #[command(
        about = "Scan a source tree and replace the index",
        after_help = "Examples:\n  codevision index .\n  codevision index ./src --threads 4"
    )]
    Index {
        /// Root directory to scan
        #[arg(value_name = "ROOT")]
        root: PathBuf,

        /// Number of extraction threads
        #[arg(short, long)]
        threads: Option<usize>,
    },

    #[command(
        about = "Print the source of every file declaring a method or class",
        after_help = "Examples:\n  codevision retrieve ProcessOrder\n  codevision retrieve OrderService --kind class\n  codevision retrieve processorder --json"
    )]
    Retrieve {
        /// Method or class name (case-insensitive)
        target: String,

        #[arg(short, long, value_enum, default_value_t = TargetKind::Method)]
        kind: TargetKind,

        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },

    #[command(about = "List every method transitively called from a method")]
    Related {
        /// Method name (case-insensitive)
        method: String,

        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },

    #[command(about = "Show recorded complexity for a method or class")]
    Complexity {
        /// Method or class name (case-insensitive)
        target: String,

        #[arg(short, long, value_enum, default_value_t = TargetKind::Method)]
        kind: TargetKind,

        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },

    #[command(about = "Export the file dependency graph")]
    Graph {
        /// Label file nodes by file name instead of path
        #[arg(long)]
        basename: bool,

        #[arg(short, long, value_enum, default_value = "edges")]
        format: GraphFormat,
    },

    #[command(about = "List indexed classes and qualified methods")]
    List,

    #[command(about = "Concatenate a source tree into one text bundle")]
    Merge {
        /// Root directory to merge
        #[arg(value_name = "ROOT")]
        root: PathBuf,

        /// Write the bundle to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}
