//! Complexity command - recorded scores for a method or class.

use console::style;

use super::load_index;
use crate::complexity::rating;
use crate::config::Settings;
use crate::io::{ExitCode, OutputFormat, print_json};
use crate::retrieve::{Retriever, TargetMetrics};
use crate::types::TargetKind;

/// Run the complexity command.
pub fn run(target: &str, kind: TargetKind, format: OutputFormat, settings: &Settings) -> ExitCode {
    let index = match load_index(settings) {
        Ok(index) => index,
        Err(code) => return code,
    };

    let Some(context) = Retriever::new(&index).analysis_context(target, kind) else {
        eprintln!("No {kind} named '{target}' in the index");
        return ExitCode::NotFound;
    };

    if format.is_json() {
        return print_json(&context);
    }

    print_metrics(&context.metrics);
    ExitCode::Success
}

pub(super) fn print_metrics(metrics: &[TargetMetrics]) {
    for entry in metrics {
        match entry {
            TargetMetrics::Method {
                file,
                name,
                score,
                breakdown,
            } => {
                println!(
                    "{} ({file}): {} [{}]",
                    style(name).bold(),
                    score,
                    rating(*score)
                );
                for (label, count) in breakdown.entries().iter().filter(|(_, c)| *c > 0) {
                    println!("  {label:<10} {count}");
                }
            }
            TargetMetrics::Class {
                file,
                name,
                score,
                structure,
            } => {
                println!("{} ({file}): {score:.2}", style(name).bold());
                println!("  properties {}", structure.properties);
                println!("  methods    {}", structure.methods);
                println!("  fields     {}", structure.fields);
                println!("  nested     {}", structure.nested_classes);
                println!("  interfaces {}", structure.interfaces);
            }
        }
    }
}
