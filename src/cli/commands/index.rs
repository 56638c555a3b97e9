//! Index command - scan a source tree and replace the persisted index.

use std::path::Path;
use std::sync::Arc;

use crate::config::Settings;
use crate::indexing::ProjectIndexer;
use crate::io::ExitCode;
use crate::storage::IndexPersistence;

const MAX_DIAGNOSTICS_SHOWN: usize = 10;

/// Run the index command.
pub fn run(root: &Path, threads: Option<usize>, settings: &Settings) -> ExitCode {
    let mut settings = settings.clone();
    if let Some(threads) = threads {
        settings.indexing.parallel_threads = threads;
    }

    let persistence = IndexPersistence::new(settings.index_dir());
    let indexer = ProjectIndexer::new(Arc::new(settings));

    let report = match indexer.scan_and_save(root, &persistence) {
        Ok(report) => report,
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::from_index_error(&e);
        }
    };

    let index = &report.index;
    println!(
        "Indexed {} files in {:.2?}",
        report.files_indexed, report.elapsed
    );
    println!("  Classes:      {}", index.class_count());
    println!("  Methods:      {}", index.method_count());
    println!("  Call edges:   {}", index.call_edge_count());
    println!("  Dependencies: {}", index.dependency_count());
    println!("Index saved to: {}", persistence.index_file().display());

    if !report.diagnostics.is_empty() {
        eprintln!("Skipped {} unreadable file(s):", report.diagnostics.len());
        for diagnostic in report.diagnostics.iter().take(MAX_DIAGNOSTICS_SHOWN) {
            eprintln!("  {}", diagnostic.message);
        }
        if report.diagnostics.len() > MAX_DIAGNOSTICS_SHOWN {
            eprintln!(
                "  ... and {} more",
                report.diagnostics.len() - MAX_DIAGNOSTICS_SHOWN
            );
        }
    }

    ExitCode::Success
}
