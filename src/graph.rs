//! File-to-dependency graph.
//!
//! A direct projection of the index: one node per file (or file basename),
//! one node per dependency name, and an edge for every dependency a file
//! records. Nothing is resolved transitively, so cycles cannot arise from
//! the projection itself.

use petgraph::dot::{Config, Dot};
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

use crate::storage::Index;

/// How file nodes are labelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NodeLabel {
    /// Root-relative path, as keyed in the index.
    #[default]
    Path,
    /// File name only. Files sharing a name share a node.
    Basename,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    File,
    Dependency,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GraphNode {
    pub label: String,
    pub kind: NodeKind,
}

impl fmt::Display for GraphNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DependsOn;

impl fmt::Display for DependsOn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("depends on")
    }
}

pub struct DependencyGraph {
    graph: DiGraph<GraphNode, DependsOn>,
    node_map: HashMap<(NodeKind, String), NodeIndex>,
}

#[derive(Serialize)]
struct JsonGraph<'a> {
    nodes: Vec<JsonNode<'a>>,
    edges: Vec<JsonEdge<'a>>,
}

#[derive(Serialize)]
struct JsonNode<'a> {
    id: usize,
    label: &'a str,
    kind: NodeKind,
}

#[derive(Serialize)]
struct JsonEdge<'a> {
    source: &'a str,
    target: &'a str,
}

impl DependencyGraph {
    pub fn new() -> Self {
        Self {
            graph: DiGraph::new(),
            node_map: HashMap::new(),
        }
    }

    /// Project `index` into a graph, visiting files in key order.
    pub fn from_index(index: &Index, labels: NodeLabel) -> Self {
        let mut graph = Self::new();
        for (path, record) in &index.files {
            let label = match labels {
                NodeLabel::Path => path.clone(),
                NodeLabel::Basename => basename(path).to_string(),
            };
            let file = graph.add_node(NodeKind::File, label);
            for dependency in &record.dependencies {
                let dep = graph.add_node(NodeKind::Dependency, dependency.clone());
                graph.graph.update_edge(file, dep, DependsOn);
            }
        }
        tracing::debug!(
            target: "graph",
            "built dependency graph: {} nodes, {} edges",
            graph.node_count(),
            graph.edge_count()
        );
        graph
    }

    fn add_node(&mut self, kind: NodeKind, label: String) -> NodeIndex {
        if let Some(&idx) = self.node_map.get(&(kind, label.clone())) {
            return idx;
        }
        let idx = self.graph.add_node(GraphNode {
            label: label.clone(),
            kind,
        });
        self.node_map.insert((kind, label), idx);
        idx
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// `(file, dependency)` pairs in insertion order.
    pub fn edges(&self) -> Vec<(&str, &str)> {
        self.graph
            .edge_references()
            .map(|edge| {
                (
                    self.graph[edge.source()].label.as_str(),
                    self.graph[edge.target()].label.as_str(),
                )
            })
            .collect()
    }

    /// Dependencies recorded for one file node.
    pub fn dependencies_of(&self, file: &str) -> Vec<&str> {
        let Some(&idx) = self.node_map.get(&(NodeKind::File, file.to_string())) else {
            return Vec::new();
        };
        let mut deps: Vec<&str> = self
            .graph
            .neighbors(idx)
            .map(|n| self.graph[n].label.as_str())
            .collect();
        deps.sort_unstable();
        deps
    }

    /// Graphviz DOT rendering.
    pub fn to_dot(&self) -> String {
        format!("{}", Dot::with_config(&self.graph, &[Config::EdgeNoLabel]))
    }

    /// JSON rendering: `{ "nodes": [...], "edges": [...] }`.
    pub fn to_json(&self) -> serde_json::Result<String> {
        let nodes = self
            .graph
            .node_indices()
            .map(|idx| JsonNode {
                id: idx.index(),
                label: &self.graph[idx].label,
                kind: self.graph[idx].kind,
            })
            .collect();
        let edges = self
            .edges()
            .into_iter()
            .map(|(source, target)| JsonEdge { source, target })
            .collect();
        serde_json::to_string_pretty(&JsonGraph { nodes, edges })
    }
}

impl Default for DependencyGraph {
    fn default() -> Self {
        Self::new()
    }
}

fn basename(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}
