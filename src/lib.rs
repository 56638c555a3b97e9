//! Static analysis of C# source trees.
//!
//! A lexical extractor turns each source file into classes, methods, call
//! edges and `using` dependencies. The indexer folds those into a persisted
//! [`Index`] snapshot, and the query side answers call-closure, source
//! retrieval, complexity and dependency-graph questions from that snapshot.

pub mod catalog;
pub mod cli;
pub mod complexity;
pub mod config;
pub mod error;
pub mod graph;
pub mod indexing;
pub mod io;
pub mod logging;
pub mod parsing;
pub mod retrieve;
pub mod storage;
pub mod types;

pub use catalog::catalog;
pub use complexity::{ClassStructure, ConstructCounts, score_constructs};
pub use config::Settings;
pub use error::{Diagnostic, ExtractError, IndexError, IndexResult};
pub use graph::{DependencyGraph, NodeLabel};
pub use indexing::{FileWalker, MergedBundle, ProjectIndexer, ScanReport, merge_sources};
pub use parsing::{FileExtraction, extract};
pub use retrieve::{AnalysisContext, CodeBundle, RelevantCode, Retriever, TargetMetrics};
pub use storage::{FileRecord, Index, IndexPersistence, StorageError};
pub use types::{CallEdge, MethodEntity, TargetKind};
