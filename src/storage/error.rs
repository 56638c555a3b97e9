use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Index unavailable: no index found at '{path}'. Run 'codevision index <ROOT>' first")]
    Missing { path: PathBuf },

    #[error("Index at '{path}' is corrupted: {reason}. Re-run 'codevision index <ROOT>'")]
    Corrupt { path: PathBuf, reason: String },

    #[error("Index format version {found} is not supported (expected {expected})")]
    IncompatibleVersion { found: u32, expected: u32 },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl StorageError {
    /// Missing and corrupt indexes are both reported to callers as "index unavailable".
    pub fn is_unavailable(&self) -> bool {
        matches!(
            self,
            StorageError::Missing { .. }
                | StorageError::Corrupt { .. }
                | StorageError::IncompatibleVersion { .. }
        )
    }
}

pub type StorageResult<T> = Result<T, StorageError>;
