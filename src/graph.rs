//! In-memory dependency graph built from a parsed report.

use indexmap::{IndexMap, IndexSet};
use std::fmt;

/// Kind of action an entity represents.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EntityType {
    Table,
    View,
    Incremental,
    Operation,
    Assertion,
    Declaration,
    /// Free-form type the report declared but we don't recognize.
    Other(String),
    /// Sentinel for names referenced without their own record.
    Unknown,
}

impl EntityType {
    pub fn from_str(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "table" => Self::Table,
            "view" => Self::View,
            "incremental" => Self::Incremental,
            "operation" | "operations" => Self::Operation,
            "assertion" => Self::Assertion,
            "declaration" => Self::Declaration,
            "unknown" | "" => Self::Unknown,
            _ => Self::Other(s.trim().to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Table => "table",
            Self::View => "view",
            Self::Incremental => "incremental",
            Self::Operation => "operation",
            Self::Assertion => "assertion",
            Self::Declaration => "declaration",
            Self::Other(s) => s,
            Self::Unknown => "unknown",
        }
    }
}

impl AsRef<str> for EntityType {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NodeRecord {
    pub entity_type: EntityType,
    /// Upstream entities, in report order.
    pub dependencies: Vec<String>,
    /// Downstream entities, in report order.
    pub dependents: Vec<String>,
}

impl NodeRecord {
    pub fn new(entity_type: EntityType) -> Self {
        Self {
            entity_type,
            dependencies: Vec::new(),
            dependents: Vec::new(),
        }
    }

    /// Record substituted for dangling references.
    pub fn unknown() -> Self {
        Self::new(EntityType::Unknown)
    }
}

static UNKNOWN_NODE: std::sync::LazyLock<NodeRecord> = std::sync::LazyLock::new(NodeRecord::unknown);

/// Schema of a qualified name: everything before the first `.`.
pub fn schema_of(name: &str) -> &str {
    name.split_once('.').map_or(name, |(schema, _)| schema)
}

/// Entity name -> record, in the order entities first appear in the report.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Graph {
    nodes: IndexMap<String, NodeRecord>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a record, replacing any earlier record for the same name
    /// while keeping its original position.
    pub fn insert(&mut self, name: impl Into<String>, record: NodeRecord) {
        self.nodes.insert(name.into(), record);
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.nodes.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&NodeRecord> {
        self.nodes.get(name)
    }

    /// Record for `name`, or the unknown sentinel for dangling references.
    pub fn node_of(&self, name: &str) -> &NodeRecord {
        self.nodes.get(name).unwrap_or(&UNKNOWN_NODE)
    }

    pub fn entities(&self) -> impl Iterator<Item = (&str, &NodeRecord)> {
        self.nodes.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn entities_in_schema(&self, schema: &str) -> Vec<&str> {
        self.nodes
            .keys()
            .map(String::as_str)
            .filter(|name| schema_of(name) == schema)
            .collect()
    }

    /// Distinct schemas in order of first appearance.
    pub fn all_schemas(&self) -> IndexSet<&str> {
        self.nodes.keys().map(|name| schema_of(name)).collect()
    }

    /// Incoming edges of `name` (its dependencies).
    pub fn in_edges(&self, name: &str) -> &[String] {
        &self.node_of(name).dependencies
    }

    /// Outgoing edges of `name` (its dependents).
    pub fn out_edges(&self, name: &str) -> &[String] {
        &self.node_of(name).dependents
    }
}
