//! Name-based retrieval over an index snapshot.
//!
//! All lookups compare names case-insensitively. Lookup is by plain name, so
//! several files declaring the same name all match and their results are
//! unioned.

use serde::Serialize;
use std::collections::{BTreeSet, HashMap, HashSet, VecDeque};

use crate::complexity::{ClassStructure, ConstructCounts};
use crate::error::read_source;
use crate::storage::{FileRecord, Index};
use crate::types::{TargetKind, name_key, same_name};

/// Outcome of a source lookup. An absent target is a value, not an error.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RelevantCode {
    NotFound,
    Found(CodeBundle),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CodeBundle {
    /// Concatenated file contents, each preceded by a `// File: <path>` marker.
    pub source: String,
    /// Root-relative paths of the files in the bundle.
    pub files: Vec<String>,
    pub related: BTreeSet<String>,
    /// Set when `source` is larger than the configured context budget.
    pub over_budget: bool,
}

/// Inputs for describing one target: who calls it and how complex it is.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisContext {
    pub target: String,
    pub kind: TargetKind,
    pub callers: Vec<String>,
    pub metrics: Vec<TargetMetrics>,
}

/// Complexity of a target as recorded for one declaring file.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum TargetMetrics {
    Method {
        file: String,
        name: String,
        score: u32,
        breakdown: ConstructCounts,
    },
    Class {
        file: String,
        name: String,
        score: f64,
        structure: ClassStructure,
    },
}

pub struct Retriever<'a> {
    index: &'a Index,
    max_context_bytes: usize,
}

impl<'a> Retriever<'a> {
    pub fn new(index: &'a Index) -> Self {
        Self {
            index,
            max_context_bytes: usize::MAX,
        }
    }

    /// Soft limit for [`relevant_code`](Self::relevant_code) bundles.
    pub fn with_context_budget(mut self, max_context_bytes: usize) -> Self {
        self.max_context_bytes = max_context_bytes;
        self
    }

    /// Every callee transitively reachable from `target` through call edges.
    ///
    /// The visited set is shared across the whole traversal, so each name is
    /// expanded once and cycles terminate. `target` itself is never part of
    /// the result. When a name appears with several spellings, the first one
    /// met in index order is reported.
    pub fn related_symbols(&self, target: &str) -> BTreeSet<String> {
        let mut callees_by_caller: HashMap<String, Vec<&str>> = HashMap::new();
        for edge in self.index.call_edges() {
            callees_by_caller
                .entry(name_key(&edge.caller))
                .or_default()
                .push(&edge.callee);
        }

        let mut visited: HashSet<String> = HashSet::from([name_key(target)]);
        let mut related = BTreeSet::new();
        let mut worklist = VecDeque::from([name_key(target)]);

        while let Some(caller) = worklist.pop_front() {
            let Some(callees) = callees_by_caller.get(&caller) else {
                continue;
            };
            for &callee in callees {
                let key = name_key(callee);
                if visited.insert(key.clone()) {
                    related.insert(callee.to_string());
                    worklist.push_back(key);
                }
            }
        }

        tracing::debug!(
            target: "retrieve",
            "closure of '{target}': {} symbols",
            related.len()
        );
        related
    }

    /// Source of every file declaring `target`, plus its related symbols.
    ///
    /// For a method, related symbols are the call closure of the name. For a
    /// class, they are the qualified names of the methods declared in every
    /// matching class.
    pub fn relevant_code(&self, target: &str, kind: TargetKind) -> RelevantCode {
        let matches = self.matching_files(target, kind);
        if matches.is_empty() {
            tracing::debug!(target: "retrieve", "no {kind} named '{target}'");
            return RelevantCode::NotFound;
        }

        let related = match kind {
            TargetKind::Method => self.related_symbols(target),
            TargetKind::Class => matches
                .iter()
                .flat_map(|(_, record)| record.methods.iter())
                .filter(|m| m.class.as_deref().is_some_and(|c| same_name(c, target)))
                .map(|m| m.qualified_name())
                .collect(),
        };

        let mut source = String::new();
        let mut files = Vec::new();
        for (path, _) in &matches {
            match read_source(&self.index.resolve(path)) {
                Ok(content) => {
                    source.push_str("\n\n// File: ");
                    source.push_str(path);
                    source.push('\n');
                    source.push_str(&content);
                    files.push((*path).to_string());
                }
                Err(e) => tracing::warn!(target: "retrieve", "skipping file: {e}"),
            }
        }

        let over_budget = source.len() > self.max_context_bytes;
        if over_budget {
            tracing::warn!(
                target: "retrieve",
                "bundle for '{target}' is {} bytes, over the {} byte budget",
                source.len(),
                self.max_context_bytes
            );
        }

        RelevantCode::Found(CodeBundle {
            source,
            files,
            related,
            over_budget,
        })
    }

    /// Callers whose call edges name `name`, sorted and de-duplicated.
    pub fn callers_of(&self, name: &str) -> Vec<String> {
        self.index
            .call_edges()
            .filter(|edge| same_name(&edge.callee, name))
            .map(|edge| edge.caller.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Complexity of `target` in every file that records it.
    pub fn target_metrics(&self, target: &str, kind: TargetKind) -> Vec<TargetMetrics> {
        let mut metrics = Vec::new();
        for (path, record) in &self.index.files {
            let complexity = &record.complexity;
            match kind {
                TargetKind::Method => {
                    for (name, &score) in &complexity.per_method {
                        if !same_name(method_part(name), target) {
                            continue;
                        }
                        metrics.push(TargetMetrics::Method {
                            file: path.clone(),
                            name: name.clone(),
                            score,
                            breakdown: complexity
                                .per_method_metrics
                                .get(name)
                                .copied()
                                .unwrap_or_default(),
                        });
                    }
                }
                TargetKind::Class => {
                    for (name, &score) in &complexity.per_class {
                        if !same_name(name, target) {
                            continue;
                        }
                        metrics.push(TargetMetrics::Class {
                            file: path.clone(),
                            name: name.clone(),
                            score,
                            structure: complexity
                                .per_class_metrics
                                .get(name)
                                .copied()
                                .unwrap_or_default(),
                        });
                    }
                }
            }
        }
        metrics
    }

    /// Callers and metrics for `target`, or `None` when the index has no
    /// complexity record for it.
    pub fn analysis_context(&self, target: &str, kind: TargetKind) -> Option<AnalysisContext> {
        let metrics = self.target_metrics(target, kind);
        if metrics.is_empty() {
            return None;
        }
        Some(AnalysisContext {
            target: target.to_string(),
            kind,
            callers: self.callers_of(target),
            metrics,
        })
    }

    fn matching_files(&self, target: &str, kind: TargetKind) -> Vec<(&'a str, &'a FileRecord)> {
        self.index
            .files
            .iter()
            .filter(|(_, record)| match kind {
                TargetKind::Method => record.declares_method(target),
                TargetKind::Class => record.declares_class(target),
            })
            .map(|(path, record)| (path.as_str(), record))
            .collect()
    }
}

/// `Class.method` -> `method`; a plain name is returned unchanged.
fn method_part(qualified: &str) -> &str {
    qualified.rsplit('.').next().unwrap_or(qualified)
}
