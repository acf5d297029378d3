//! Graph edge types - relationships from cultures to concepts and themes

use serde::{Deserialize, Serialize};

/// Types of relationships in the knowledge graph
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum EdgeRelation {
    /// A culture's entries reference a concept
    HasConcept,
    /// A culture's entries reference a theme
    HasTheme,
}

impl std::fmt::Display for EdgeRelation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EdgeRelation::HasConcept => write!(f, "has_concept"),
            EdgeRelation::HasTheme => write!(f, "has_theme"),
        }
    }
}

/// An edge in the knowledge graph.
///
/// The id keys on the `(source, target)` pair, so repeated references
/// collapse into a single edge. Edges only ever appear through a full
/// rebuild; they are never removed from a loaded graph.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphEdge {
    pub id: String,
    pub source_id: String,
    pub target_id: String,
    pub relation: EdgeRelation,
}

impl GraphEdge {
    /// Create an edge between two node ids
    pub fn new(
        source_id: impl Into<String>,
        target_id: impl Into<String>,
        relation: EdgeRelation,
    ) -> Self {
        let source_id = source_id.into();
        let target_id = target_id.into();
        let id = Self::edge_id(&source_id, &target_id);
        Self {
            id,
            source_id,
            target_id,
            relation,
        }
    }

    /// Deterministic edge id for a source/target pair
    pub fn edge_id(source_id: &str, target_id: &str) -> String {
        format!("edge-{}-{}", source_id, target_id)
    }
}
