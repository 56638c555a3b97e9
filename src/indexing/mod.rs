pub mod indexer;
pub mod merge;
pub mod walker;

pub use indexer::{ProjectIndexer, ScanReport};
pub use merge::{MergedBundle, merge_sources, write_bundle};
pub use walker::FileWalker;
