//! File system walker for discovering source files to index
//!
//! Directory traversal with support for:
//! - .gitignore rules (optional)
//! - `.codevisionignore` files
//! - Custom ignore patterns from configuration
//! - Extension filtering
//! - Hidden file handling

use ignore::WalkBuilder;
use ignore::overrides::OverrideBuilder;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::Settings;
use crate::config::IGNORE_FILE;

/// Walks directories to find source files to index
pub struct FileWalker {
    settings: Arc<Settings>,
}

impl FileWalker {
    /// Create a new file walker with the given settings
    pub fn new(settings: Arc<Settings>) -> Self {
        Self { settings }
    }

    /// Walk a directory and return the matching files in path order.
    ///
    /// Sorting keeps scans deterministic regardless of directory read order.
    pub fn walk(&self, root: &Path) -> Vec<PathBuf> {
        let indexing = &self.settings.indexing;
        let mut builder = WalkBuilder::new(root);

        builder
            .hidden(false)
            .git_ignore(indexing.respect_gitignore)
            .git_global(indexing.respect_gitignore)
            .git_exclude(indexing.respect_gitignore)
            .follow_links(indexing.follow_links)
            .max_depth(None)
            .require_git(false); // Allow gitignore to work in non-git directories

        builder.add_custom_ignore_filename(IGNORE_FILE);

        // Exclusion globs go through overrides, each prefixed with `!`
        let mut override_builder = OverrideBuilder::new(root);
        for pattern in &indexing.ignore_patterns {
            if let Err(e) = override_builder.add(&format!("!{pattern}")) {
                tracing::warn!(target: "walker", "invalid ignore pattern '{pattern}': {e}");
            }
        }

        match override_builder.build() {
            Ok(overrides) => {
                builder.overrides(overrides);
            }
            Err(e) => tracing::warn!(target: "walker", "ignore patterns not applied: {e}"),
        }

        let mut files: Vec<PathBuf> = builder
            .build()
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(e) => {
                    tracing::warn!(target: "walker", "skipping entry: {e}");
                    None
                }
            })
            .filter(|entry| entry.file_type().is_some_and(|ft| ft.is_file()))
            .map(|entry| entry.into_path())
            .filter(|path| {
                // Skip hidden files (files starting with .)
                let hidden = path
                    .file_name()
                    .and_then(|name| name.to_str())
                    .is_some_and(|name| name.starts_with('.'));
                !hidden && indexing.is_source_file(path)
            })
            .collect();

        files.sort();
        crate::debug_event!("walker", "walked", "{} files under {}", files.len(), root.display());
        files
    }
}
