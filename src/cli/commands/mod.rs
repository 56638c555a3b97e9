//! Command implementations for the CLI.
//!
//! Each command is implemented in its own module and returns an [`ExitCode`].

pub mod complexity;
pub mod graph;
pub mod index;
pub mod init;
pub mod list;
pub mod merge;
pub mod related;
pub mod retrieve;

use crate::config::Settings;
use crate::io::ExitCode;
use crate::storage::{Index, IndexPersistence};

/// Load the persisted index, reporting why it is unavailable on failure.
pub(crate) fn load_index(settings: &Settings) -> Result<Index, ExitCode> {
    let persistence = IndexPersistence::new(settings.index_dir());
    persistence.load().map_err(|e| {
        eprintln!("Error: {e}");
        if e.is_unavailable() {
            eprintln!("Run 'codevision index <ROOT>' to build a fresh index.");
        }
        ExitCode::from_storage_error(&e)
    })
}
