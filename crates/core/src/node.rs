//! Graph node types - cultures, concepts, and themes

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// The kind of a graph node
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    /// A culture anchoring knowledge entries
    Culture,
    /// A concept referenced by one or more cultures
    Concept,
    /// A recurring theme referenced by one or more cultures
    Theme,
}

impl NodeKind {
    /// Stable prefix used in node ids
    pub fn prefix(&self) -> &'static str {
        match self {
            NodeKind::Culture => "culture",
            NodeKind::Concept => "concept",
            NodeKind::Theme => "theme",
        }
    }
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.prefix())
    }
}

/// A 2-D position assigned by the layout engine
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// A node in the assembled knowledge graph.
///
/// The id is a pure function of `(kind, canonical label)`, so the assembler
/// holds exactly one node per distinct pair no matter how many entries
/// reference it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphNode {
    pub id: String,
    pub kind: NodeKind,

    /// Display label, as first seen in the input
    pub label: String,

    /// Position assigned by the layout engine (zero until laid out)
    #[serde(default)]
    pub position: Point,

    /// Number of entries anchored here; only meaningful for culture nodes
    #[serde(default)]
    pub member_count: usize,

    /// Cultures referencing this node; only populated for concepts/themes
    #[serde(default)]
    pub associated_cultures: BTreeSet<String>,
}

impl GraphNode {
    /// Create a node for a raw label
    pub fn new(kind: NodeKind, label: impl Into<String>) -> Self {
        let label = label.into();
        let id = Self::node_id(kind, &label);
        Self {
            id,
            kind,
            label,
            position: Point::default(),
            member_count: 0,
            associated_cultures: BTreeSet::new(),
        }
    }

    /// Canonicalize a label for deduplication: lowercase, trimmed, internal
    /// whitespace collapsed
    pub fn canonicalize(label: &str) -> String {
        label
            .to_lowercase()
            .trim()
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Deterministic node id for a `(kind, label)` pair
    pub fn node_id(kind: NodeKind, label: &str) -> String {
        format!("{}-{}", kind.prefix(), Self::canonicalize(label))
    }

    /// Themes arrive underscore-separated; show them with spaces
    pub fn display_label(&self) -> String {
        match self.kind {
            NodeKind::Theme => self.label.replace('_', " "),
            _ => self.label.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonicalization() {
        assert_eq!(GraphNode::canonicalize("  Ubuntu   Spirit  "), "ubuntu spirit");
        assert_eq!(GraphNode::canonicalize("UBUNTU"), "ubuntu");
    }

    #[test]
    fn test_node_id_is_deterministic() {
        let a = GraphNode::node_id(NodeKind::Concept, "Ubuntu");
        let b = GraphNode::node_id(NodeKind::Concept, " ubuntu ");
        assert_eq!(a, b);
        assert_eq!(a, "concept-ubuntu");

        // Same label under a different kind is a different node
        assert_ne!(a, GraphNode::node_id(NodeKind::Theme, "Ubuntu"));
    }

    #[test]
    fn test_theme_display_label() {
        let node = GraphNode::new(NodeKind::Theme, "communal_living");
        assert_eq!(node.display_label(), "communal living");
    }
}
