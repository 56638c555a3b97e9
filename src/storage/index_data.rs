//! Serializable index snapshot.
//!
//! Plain data. Every map is a `BTreeMap` and nothing time-dependent is
//! recorded, so serializing the same scan twice yields identical bytes.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::complexity::{ClassStructure, ConstructCounts, score_constructs};
use crate::parsing::FileExtraction;
use crate::types::{CallEdge, MethodEntity, same_name};

/// Version of the on-disk index format.
pub const INDEX_FORMAT_VERSION: u32 = 1;

/// The whole-project snapshot produced by one scan.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Index {
    pub version: u32,
    /// Scanned root directory. File keys are relative to it.
    pub root: String,
    /// Root-relative, `/`-separated path to the file's record.
    pub files: BTreeMap<String, FileRecord>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct FileRecord {
    pub classes: Vec<String>,
    pub methods: Vec<MethodEntity>,
    pub dependencies: Vec<String>,
    pub call_edges: Vec<CallEdge>,
    pub complexity: FileComplexity,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct FileComplexity {
    pub overall: u32,
    pub overall_metrics: ConstructCounts,
    /// Keyed by qualified method name (`Class.method`, or the plain name when
    /// no enclosing class is known).
    pub per_method: BTreeMap<String, u32>,
    pub per_method_metrics: BTreeMap<String, ConstructCounts>,
    pub per_class: BTreeMap<String, f64>,
    pub per_class_metrics: BTreeMap<String, ClassStructure>,
}

impl FileRecord {
    /// Build a record from one file's text and its extraction.
    ///
    /// Overloads share a qualified name; the highest-scoring body is kept.
    pub fn from_extraction(source: &str, extraction: FileExtraction) -> Self {
        let (overall, overall_metrics) = score_constructs(source);
        let mut complexity = FileComplexity {
            overall,
            overall_metrics,
            ..FileComplexity::default()
        };

        for method in &extraction.methods {
            let key = method.entity.qualified_name();
            let (score, metrics) = score_constructs(method.body_text(source));
            if complexity.per_method.get(&key).is_some_and(|&existing| existing >= score) {
                continue;
            }
            complexity.per_method.insert(key.clone(), score);
            complexity.per_method_metrics.insert(key, metrics);
        }

        for (class, structure) in &extraction.class_structures {
            complexity
                .per_class
                .insert(class.clone(), structure.weighted_score());
            complexity.per_class_metrics.insert(class.clone(), *structure);
        }

        Self {
            classes: extraction.classes,
            methods: extraction.methods.into_iter().map(|m| m.entity).collect(),
            dependencies: extraction.dependencies,
            call_edges: extraction.call_edges,
            complexity,
        }
    }

    pub fn declares_class(&self, name: &str) -> bool {
        self.classes.iter().any(|c| same_name(c, name))
    }

    pub fn declares_method(&self, name: &str) -> bool {
        self.methods.iter().any(|m| m.is_named(name))
    }
}

impl Index {
    pub fn new(root: impl Into<String>) -> Self {
        Self {
            version: INDEX_FORMAT_VERSION,
            root: root.into(),
            files: BTreeMap::new(),
        }
    }

    pub fn insert(&mut self, relative_path: String, record: FileRecord) {
        self.files.insert(relative_path, record);
    }

    /// Absolute location of an indexed file.
    pub fn resolve(&self, relative_path: &str) -> PathBuf {
        Path::new(&self.root).join(relative_path)
    }

    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    pub fn class_count(&self) -> usize {
        self.files.values().map(|f| f.classes.len()).sum()
    }

    pub fn method_count(&self) -> usize {
        self.files.values().map(|f| f.methods.len()).sum()
    }

    pub fn call_edge_count(&self) -> usize {
        self.files.values().map(|f| f.call_edges.len()).sum()
    }

    pub fn dependency_count(&self) -> usize {
        self.files.values().map(|f| f.dependencies.len()).sum()
    }

    /// Every call edge in the index, in file-key order.
    pub fn call_edges(&self) -> impl Iterator<Item = &CallEdge> {
        self.files.values().flat_map(|f| f.call_edges.iter())
    }
}
