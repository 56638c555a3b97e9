//! Graph command - export the file dependency graph.

use super::load_index;
use crate::cli::GraphFormat;
use crate::config::Settings;
use crate::graph::{DependencyGraph, NodeLabel};
use crate::io::ExitCode;

/// Run the graph command.
pub fn run(basename: bool, format: GraphFormat, settings: &Settings) -> ExitCode {
    let index = match load_index(settings) {
        Ok(index) => index,
        Err(code) => return code,
    };

    let labels = if basename {
        NodeLabel::Basename
    } else {
        NodeLabel::Path
    };
    let graph = DependencyGraph::from_index(&index, labels);

    match format {
        GraphFormat::Edges => {
            for (file, dependency) in graph.edges() {
                println!("{file} -> {dependency}");
            }
        }
        GraphFormat::Dot => print!("{}", graph.to_dot()),
        GraphFormat::Json => match graph.to_json() {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("Error: failed to serialize graph: {e}");
                return ExitCode::GeneralError;
            }
        },
    }
    ExitCode::Success
}
