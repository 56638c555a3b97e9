//! Persistence for the index snapshot.
//!
//! A save writes the whole snapshot to a sibling temporary file and renames it
//! over the previous one, so readers see either the old or the new snapshot.
//! A file that still fails to parse (truncated by a crash, edited by hand) is
//! reported as corrupt and never replaced by an empty index.

use std::fs;
use std::path::{Path, PathBuf};

use super::error::{StorageError, StorageResult};
use super::index_data::{INDEX_FORMAT_VERSION, Index};

/// File name of the snapshot inside the index directory.
pub const INDEX_FILE_NAME: &str = "code_index.json";

/// Manages persistence of the index
#[derive(Debug, Clone)]
pub struct IndexPersistence {
    base_path: PathBuf,
}

impl IndexPersistence {
    /// Create a new persistence manager
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    pub fn index_file(&self) -> PathBuf {
        self.base_path.join(INDEX_FILE_NAME)
    }

    /// Replace the persisted snapshot with `index`.
    #[must_use = "Save errors should be handled to ensure data is persisted"]
    pub fn save(&self, index: &Index) -> StorageResult<()> {
        fs::create_dir_all(&self.base_path)?;

        let mut json = serde_json::to_string_pretty(index)
            .map_err(|e| StorageError::Serialization(e.to_string()))?;
        json.push('\n');

        let target = self.index_file();
        let temp = self
            .base_path
            .join(format!("{INDEX_FILE_NAME}.{}.tmp", std::process::id()));
        fs::write(&temp, json)?;
        if let Err(e) = fs::rename(&temp, &target) {
            let _ = fs::remove_file(&temp);
            return Err(e.into());
        }

        tracing::debug!(
            target: "storage",
            "saved index with {} files to {}",
            index.file_count(),
            target.display()
        );
        Ok(())
    }

    /// Load the persisted snapshot.
    #[must_use = "Load errors should be handled appropriately"]
    pub fn load(&self) -> StorageResult<Index> {
        let path = self.index_file();
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(StorageError::Missing { path });
            }
            Err(e) => return Err(e.into()),
        };

        let index: Index = serde_json::from_slice(&bytes).map_err(|e| StorageError::Corrupt {
            path: path.clone(),
            reason: e.to_string(),
        })?;

        if index.version != INDEX_FORMAT_VERSION {
            return Err(StorageError::IncompatibleVersion {
                found: index.version,
                expected: INDEX_FORMAT_VERSION,
            });
        }

        tracing::debug!(
            target: "storage",
            "loaded index with {} files from {}",
            index.file_count(),
            path.display()
        );
        Ok(index)
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsing::extract;
    use crate::storage::FileRecord;
    use tempfile::TempDir;

    fn sample_index() -> Index {
        let source = "class A { void Foo(){ Bar(); } }";
        let mut index = Index::new("/project");
        index.insert("A.cs".to_string(), FileRecord::from_extraction(source, extract(source)));
        index
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let persistence = IndexPersistence::new(temp_dir.path().join("index"));

        let index = sample_index();
        persistence.save(&index).unwrap();
        assert!(persistence.index_file().is_file());

        let loaded = persistence.load().unwrap();
        assert_eq!(loaded, index);
    }

    #[test]
    fn test_save_leaves_no_temp_files() {
        let temp_dir = TempDir::new().unwrap();
        let persistence = IndexPersistence::new(temp_dir.path().to_path_buf());
        persistence.save(&sample_index()).unwrap();
        persistence.save(&sample_index()).unwrap();

        let names: Vec<_> = fs::read_dir(temp_dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().into_string().unwrap())
            .collect();
        assert_eq!(names, vec![INDEX_FILE_NAME.to_string()]);
    }

    #[test]
    fn test_missing_index() {
        let temp_dir = TempDir::new().unwrap();
        let persistence = IndexPersistence::new(temp_dir.path().to_path_buf());

        let err = persistence.load().unwrap_err();
        assert!(matches!(err, StorageError::Missing { .. }));
        assert!(err.is_unavailable());
    }

    #[test]
    fn test_truncated_index_is_corrupt() {
        let temp_dir = TempDir::new().unwrap();
        let persistence = IndexPersistence::new(temp_dir.path().to_path_buf());
        persistence.save(&sample_index()).unwrap();

        let full = fs::read_to_string(persistence.index_file()).unwrap();
        fs::write(persistence.index_file(), &full[..full.len() / 2]).unwrap();

        let err = persistence.load().unwrap_err();
        assert!(matches!(err, StorageError::Corrupt { .. }));
        assert!(err.is_unavailable());
    }

    #[test]
    fn test_version_mismatch_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let persistence = IndexPersistence::new(temp_dir.path().to_path_buf());
        let mut index = sample_index();
        index.version = INDEX_FORMAT_VERSION + 1;
        persistence.save(&index).unwrap();

        assert!(matches!(
            persistence.load(),
            Err(StorageError::IncompatibleVersion { .. })
        ));
    }
}
