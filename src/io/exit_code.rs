//! Process exit codes.
//!
//! Scripts branch on these, so the numbers are stable.

use crate::error::IndexError;
use crate::storage::StorageError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ExitCode {
    Success = 0,
    GeneralError = 1,
    /// The queried symbol is not in the index.
    NotFound = 3,
    IoError = 5,
    ConfigError = 6,
    /// The index is missing, truncated or from another format version.
    IndexCorrupted = 7,
}

impl ExitCode {
    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn is_success(self) -> bool {
        self == ExitCode::Success
    }

    pub fn from_storage_error(error: &StorageError) -> Self {
        if error.is_unavailable() {
            ExitCode::IndexCorrupted
        } else {
            ExitCode::IoError
        }
    }

    pub fn from_index_error(error: &IndexError) -> Self {
        match error {
            IndexError::FileRead { .. } | IndexError::FileWrite { .. } => ExitCode::IoError,
            IndexError::InvalidRoot(_) => ExitCode::NotFound,
            IndexError::Storage(e) => Self::from_storage_error(e),
            IndexError::ThreadPool(_) => ExitCode::GeneralError,
        }
    }
}

impl From<ExitCode> for std::process::ExitCode {
    fn from(code: ExitCode) -> Self {
        std::process::ExitCode::from(code.code())
    }
}
