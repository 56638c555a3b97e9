use serde::{Deserialize, Serialize};
use std::fmt;

/// A method declaration found by the lexical pass.
///
/// `class` is the innermost enclosing type by position in the file. It is a
/// best-effort association, not a resolved scope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodEntity {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visibility: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub return_type: Option<String>,
    pub line: u32,
}

impl MethodEntity {
    /// `Class.method` when the enclosing class is known, otherwise the plain name.
    pub fn qualified_name(&self) -> String {
        match &self.class {
            Some(class) => format!("{class}.{}", self.name),
            None => self.name.clone(),
        }
    }

    /// Case-insensitive match on the plain method name.
    pub fn is_named(&self, name: &str) -> bool {
        same_name(&self.name, name)
    }
}

/// Folded form of a symbol name. C# identifiers may be non-ASCII, so this is
/// Unicode lower-casing rather than ASCII.
pub fn name_key(name: &str) -> String {
    name.to_lowercase()
}

/// Case-insensitive symbol name comparison, consistent with [`name_key`].
pub fn same_name(a: &str, b: &str) -> bool {
    a == b || name_key(a) == name_key(b)
}

/// Caller method name to unresolved callee text, scoped to one file.
///
/// Serialized as a two-element array `[caller, callee]`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "(String, String)", into = "(String, String)")]
pub struct CallEdge {
    pub caller: String,
    pub callee: String,
}

impl CallEdge {
    pub fn new(caller: impl Into<String>, callee: impl Into<String>) -> Self {
        Self {
            caller: caller.into(),
            callee: callee.into(),
        }
    }
}

impl From<(String, String)> for CallEdge {
    fn from((caller, callee): (String, String)) -> Self {
        Self { caller, callee }
    }
}

impl From<CallEdge> for (String, String) {
    fn from(edge: CallEdge) -> Self {
        (edge.caller, edge.callee)
    }
}

/// What a lookup target names. Selects both the matching rule and the
/// complexity formula reported for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum TargetKind {
    #[default]
    Method,
    Class,
}

impl fmt::Display for TargetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TargetKind::Method => f.write_str("method"),
            TargetKind::Class => f.write_str("class"),
        }
    }
}
