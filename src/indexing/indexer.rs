//! Project scanning.
//!
//! Files are discovered by the [`FileWalker`], read and extracted in parallel
//! on a dedicated rayon pool, then folded into the [`Index`] on the calling
//! thread in path order. A file that cannot be read as UTF-8 text becomes a
//! [`Diagnostic`] and the scan continues.

use rayon::prelude::*;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use super::walker::FileWalker;
use crate::Settings;
use crate::error::{Diagnostic, ExtractError, IndexError, IndexResult, read_source};
use crate::parsing::extract;
use crate::storage::{FileRecord, Index, IndexPersistence};

/// Outcome of one scan.
#[derive(Debug, Serialize)]
pub struct ScanReport {
    pub index: Index,
    pub files_indexed: usize,
    pub diagnostics: Vec<Diagnostic>,
    #[serde(skip)]
    pub elapsed: Duration,
}

pub struct ProjectIndexer {
    settings: Arc<Settings>,
    walker: FileWalker,
}

impl ProjectIndexer {
    pub fn new(settings: Arc<Settings>) -> Self {
        let walker = FileWalker::new(Arc::clone(&settings));
        Self { settings, walker }
    }

    /// Scan `root` and build a fresh index.
    ///
    /// The result depends only on file contents: the same tree always yields
    /// the same index.
    pub fn scan(&self, root: &Path) -> IndexResult<ScanReport> {
        let started = Instant::now();
        let root = canonical_root(root)?;
        let files = self.walker.walk(&root);
        tracing::info!(target: "indexer", "scanning {} files under {}", files.len(), root.display());

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.settings.indexing.parallel_threads.max(1))
            .build()
            .map_err(|e| IndexError::ThreadPool(e.to_string()))?;

        let results: Vec<(PathBuf, Result<FileRecord, ExtractError>)> = pool.install(|| {
            files
                .par_iter()
                .map(|path| (path.clone(), process_file(path)))
                .collect()
        });

        let mut index = Index::new(root.to_string_lossy());
        let mut diagnostics = Vec::new();
        for (path, result) in results {
            match result {
                Ok(record) => {
                    let key = relative_key(&root, &path);
                    crate::debug_event!(
                        "indexer",
                        "indexed",
                        "{key} ({} methods)",
                        record.methods.len()
                    );
                    index.insert(key, record);
                }
                Err(e) => {
                    tracing::warn!(target: "indexer", "skipping file: {e}");
                    diagnostics.push(Diagnostic::from(&e));
                }
            }
        }

        let elapsed = started.elapsed();
        crate::log_event!(
            "indexer",
            "scan complete",
            "{} files, {} methods, {} skipped in {:.2?}",
            index.file_count(),
            index.method_count(),
            diagnostics.len(),
            elapsed
        );

        Ok(ScanReport {
            files_indexed: index.file_count(),
            index,
            diagnostics,
            elapsed,
        })
    }

    /// Scan `root` and replace the persisted snapshot with the result.
    pub fn scan_and_save(
        &self,
        root: &Path,
        persistence: &IndexPersistence,
    ) -> IndexResult<ScanReport> {
        let report = self.scan(root)?;
        persistence.save(&report.index)?;
        Ok(report)
    }
}

fn process_file(path: &Path) -> Result<FileRecord, ExtractError> {
    let source = read_source(path)?;
    let extraction = extract(&source);
    Ok(FileRecord::from_extraction(&source, extraction))
}

fn canonical_root(root: &Path) -> IndexResult<PathBuf> {
    if !root.is_dir() {
        return Err(IndexError::InvalidRoot(root.to_path_buf()));
    }
    root.canonicalize().map_err(|source| IndexError::FileRead {
        path: root.to_path_buf(),
        source,
    })
}

/// Root-relative path with `/` separators, used as the index key.
pub(crate) fn relative_key(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
