//! Retrieve command - source bundle and context for a method or class.

use serde::Serialize;
use std::collections::BTreeSet;

use super::load_index;
use crate::config::Settings;
use crate::io::{ExitCode, OutputFormat, print_json};
use crate::retrieve::{AnalysisContext, CodeBundle, RelevantCode, Retriever};
use crate::types::TargetKind;

#[derive(Serialize)]
struct RetrieveOutput<'a> {
    target: &'a str,
    kind: TargetKind,
    #[serde(flatten)]
    bundle: &'a CodeBundle,
    #[serde(skip_serializing_if = "Option::is_none")]
    context: Option<&'a AnalysisContext>,
}

/// Run the retrieve command.
pub fn run(target: &str, kind: TargetKind, format: OutputFormat, settings: &Settings) -> ExitCode {
    let index = match load_index(settings) {
        Ok(index) => index,
        Err(code) => return code,
    };

    let retriever =
        Retriever::new(&index).with_context_budget(settings.retrieve.max_context_bytes);
    let bundle = match retriever.relevant_code(target, kind) {
        RelevantCode::Found(bundle) => bundle,
        RelevantCode::NotFound => {
            if format.is_json() {
                print_json(&RelevantCode::NotFound);
            } else {
                eprintln!("No {kind} named '{target}' in the index");
            }
            return ExitCode::NotFound;
        }
    };
    let context = retriever.analysis_context(target, kind);

    if format.is_json() {
        return print_json(&RetrieveOutput {
            target,
            kind,
            bundle: &bundle,
            context: context.as_ref(),
        });
    }

    println!("{}", bundle.source.trim_start_matches('\n'));
    println!();
    print_symbols("Related symbols", &bundle.related);
    if let Some(context) = &context {
        print_symbols("Callers", &context.callers.iter().cloned().collect());
        super::complexity::print_metrics(&context.metrics);
    }
    if bundle.over_budget {
        eprintln!(
            "Note: bundle is {} bytes, over the {} byte context budget",
            bundle.source.len(),
            settings.retrieve.max_context_bytes
        );
    }
    ExitCode::Success
}

pub(super) fn print_symbols(title: &str, symbols: &BTreeSet<String>) {
    if symbols.is_empty() {
        println!("{title}: none");
        return;
    }
    println!("{title} ({}):", symbols.len());
    for symbol in symbols {
        println!("  {symbol}");
    }
}
