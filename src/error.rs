//! Error types for scanning and merging source trees.
//!
//! Per-file problems never surface here: they are collected as
//! [`Diagnostic`]s on the scan report. `IndexError` covers the conditions
//! that abort a whole operation.

use std::path::PathBuf;
use thiserror::Error;

use crate::storage::StorageError;

#[derive(Error, Debug)]
pub enum IndexError {
    #[error("Failed to read file '{path}': {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write file '{path}': {source}")]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Root directory '{0}' does not exist or is not a directory")]
    InvalidRoot(PathBuf),

    #[error("Failed to build thread pool: {0}")]
    ThreadPool(String),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

pub type IndexResult<T> = Result<T, IndexError>;

/// Failure to turn one file into text. Contained to that file.
#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("'{path}' is not valid UTF-8 text")]
    Decode { path: PathBuf },

    #[error("Cannot read '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ExtractError {
    pub fn path(&self) -> &PathBuf {
        match self {
            ExtractError::Decode { path } | ExtractError::Read { path, .. } => path,
        }
    }
}

/// A non-fatal problem recorded while processing a single file.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct Diagnostic {
    pub path: PathBuf,
    pub message: String,
}

impl From<&ExtractError> for Diagnostic {
    fn from(err: &ExtractError) -> Self {
        Self {
            path: err.path().clone(),
            message: err.to_string(),
        }
    }
}

/// Read a source file as UTF-8 text, dropping a leading byte-order mark.
pub fn read_source(path: &std::path::Path) -> Result<String, ExtractError> {
    let bytes = std::fs::read(path).map_err(|source| ExtractError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let mut text = String::from_utf8(bytes).map_err(|_| ExtractError::Decode {
        path: path.to_path_buf(),
    })?;
    if text.starts_with('\u{FEFF}') {
        text.drain(..'\u{FEFF}'.len_utf8());
    }
    Ok(text)
}
