pub mod error;
pub mod index_data;
pub mod persistence;

pub use error::{StorageError, StorageResult};
pub use index_data::{FileComplexity, FileRecord, INDEX_FORMAT_VERSION, Index};
pub use persistence::{INDEX_FILE_NAME, IndexPersistence};
