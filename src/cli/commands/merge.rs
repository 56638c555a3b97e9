//! Merge command - concatenate a source tree into one bundle.

use std::path::Path;
use std::sync::Arc;

use crate::config::Settings;
use crate::indexing::{FileWalker, merge_sources, write_bundle};
use crate::io::ExitCode;

pub fn run(root: &Path, output: Option<&Path>, settings: &Settings) -> ExitCode {
    let walker = FileWalker::new(Arc::new(settings.clone()));
    let bundle = match merge_sources(root, &settings.merge, &walker) {
        Ok(bundle) => bundle,
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::from_index_error(&e);
        }
    };

    for diagnostic in &bundle.diagnostics {
        eprintln!("Skipped: {}", diagnostic.message);
    }

    match output {
        Some(path) => match write_bundle(&bundle, path) {
            Ok(path) => {
                eprintln!("Merged {} files into {}", bundle.files.len(), path.display());
                ExitCode::Success
            }
            Err(e) => {
                eprintln!("Error: {e}");
                ExitCode::from_index_error(&e)
            }
        },
        None => {
            print!("{}", bundle.text);
            ExitCode::Success
        }
    }
}
