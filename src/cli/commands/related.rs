//! Related command - transitive callees of a method.

use serde::Serialize;
use std::collections::BTreeSet;

use super::load_index;
use super::retrieve::print_symbols;
use crate::config::Settings;
use crate::io::{ExitCode, OutputFormat, print_json};
use crate::retrieve::Retriever;
use crate::types::same_name;

#[derive(Serialize)]
struct RelatedOutput<'a> {
    method: &'a str,
    related: &'a BTreeSet<String>,
}

/// Run the related command.
pub fn run(method: &str, format: OutputFormat, settings: &Settings) -> ExitCode {
    let index = match load_index(settings) {
        Ok(index) => index,
        Err(code) => return code,
    };

    let known = index.files.values().any(|f| f.declares_method(method))
        || index.call_edges().any(|e| same_name(&e.caller, method));
    if !known {
        eprintln!("No method named '{method}' in the index");
        return ExitCode::NotFound;
    }

    let related = Retriever::new(&index).related_symbols(method);
    if format.is_json() {
        return print_json(&RelatedOutput {
            method,
            related: &related,
        });
    }

    print_symbols(&format!("Related symbols of {method}"), &related);
    ExitCode::Success
}
