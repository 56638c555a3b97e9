//! CLI entry point for the static analysis engine.
//!
//! Parses arguments, loads settings and dispatches to the command modules.

use anyhow::Context;
use clap::Parser;

use codevision::cli::{Cli, Commands, commands};
use codevision::config::Settings;
use codevision::io::{ExitCode, OutputFormat};
use codevision::logging;

fn load_settings(cli: &Cli) -> anyhow::Result<Settings> {
    match &cli.config {
        Some(path) => {
            let mut settings = Settings::load_from(path)
                .with_context(|| format!("failed to load {}", path.display()))?;
            settings.workspace_root = Settings::workspace_root();
            Ok(settings)
        }
        None => Settings::load().context("failed to load .codevision/settings.toml"),
    }
}

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();

    let settings = match load_settings(&cli) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Configuration error: {e:#}");
            return ExitCode::ConfigError.into();
        }
    };

    logging::init_with_config(&settings.logging);
    tracing::debug!(target: "cli", "index directory: {}", settings.index_dir().display());

    let code = match cli.command {
        Commands::Init { force } => commands::init::run_init(force),
        Commands::Config => commands::init::run_config(&settings),
        Commands::Index { root, threads } => commands::index::run(&root, threads, &settings),
        Commands::Retrieve { target, kind, json } => {
            commands::retrieve::run(&target, kind, OutputFormat::from_json_flag(json), &settings)
        }
        Commands::Related { method, json } => {
            commands::related::run(&method, OutputFormat::from_json_flag(json), &settings)
        }
        Commands::Complexity { target, kind, json } => {
            commands::complexity::run(&target, kind, OutputFormat::from_json_flag(json), &settings)
        }
        Commands::Graph { basename, format } => commands::graph::run(basename, format, &settings),
        Commands::List => commands::list::run(&settings),
        Commands::Merge { root, output } => {
            commands::merge::run(&root, output.as_deref(), &settings)
        }
    };

    code.into()
}
