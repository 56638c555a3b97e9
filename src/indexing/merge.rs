//! Merged project bundle.
//!
//! Concatenates every source file under a root into one text document, each
//! file under a header naming it and followed by a separator line.

use serde::Serialize;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use super::indexer::relative_key;
use super::walker::FileWalker;
use crate::config::MergeConfig;
use crate::error::{Diagnostic, IndexError, IndexResult, read_source};

#[derive(Debug, Serialize)]
pub struct MergedBundle {
    pub text: String,
    /// Root-relative paths of the files included, in bundle order.
    pub files: Vec<String>,
    pub diagnostics: Vec<Diagnostic>,
}

impl MergedBundle {
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

/// Merge the source files under `root` that `walker` selects.
pub fn merge_sources(
    root: &Path,
    config: &MergeConfig,
    walker: &FileWalker,
) -> IndexResult<MergedBundle> {
    if !root.is_dir() {
        return Err(IndexError::InvalidRoot(root.to_path_buf()));
    }

    let separator = "=".repeat(config.separator_width);
    let mut bundle = MergedBundle {
        text: String::new(),
        files: Vec::new(),
        diagnostics: Vec::new(),
    };

    // walk() returns paths sorted
    for path in walker.walk(root) {
        let file_name = file_name_of(&path);
        if is_excluded(&file_name, config) {
            crate::debug_event!("merge", "excluded", "{}", path.display());
            continue;
        }

        let content = match read_source(&path) {
            Ok(content) => content,
            Err(e) => {
                tracing::warn!(target: "merge", "skipping file: {e}");
                bundle.diagnostics.push(Diagnostic::from(&e));
                continue;
            }
        };

        let key = relative_key(root, &path);
        let _ = write!(
            bundle.text,
            "===== {file_name} ({key}) =====\n{content}\n\n{separator}\n\n"
        );
        bundle.files.push(key);
    }

    tracing::info!(target: "merge", "merged {} files", bundle.files.len());
    Ok(bundle)
}

fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn is_excluded(file_name: &str, config: &MergeConfig) -> bool {
    config
        .exclude_name_contains
        .iter()
        .any(|needle| !needle.is_empty() && file_name.contains(needle.as_str()))
}

/// Write a bundle to `output`, creating parent directories as needed.
pub fn write_bundle(bundle: &MergedBundle, output: &Path) -> IndexResult<PathBuf> {
    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|source| IndexError::FileWrite {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    std::fs::write(output, &bundle.text).map_err(|source| IndexError::FileWrite {
        path: output.to_path_buf(),
        source,
    })?;
    Ok(output.to_path_buf())
}
