//! Graph assembly - flat knowledge entries into a deduplicated graph

use crate::edge::{EdgeRelation, GraphEdge};
use crate::entry::KnowledgeEntry;
use crate::node::{GraphNode, NodeKind};
use std::collections::{HashMap, HashSet};

/// The assembled node/edge sets.
///
/// Nodes are ordered cultures first, then concepts, then themes, each group
/// in first-seen order; edges in creation order. The ordering is part of the
/// contract because the layout engine keys culture placement on it.
#[derive(Debug, Clone, Default)]
pub struct KnowledgeGraph {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

impl KnowledgeGraph {
    /// Number of culture nodes in the graph
    pub fn culture_count(&self) -> usize {
        self.count_kind(NodeKind::Culture)
    }

    /// Number of nodes of a given kind
    pub fn count_kind(&self, kind: NodeKind) -> usize {
        self.nodes.iter().filter(|n| n.kind == kind).count()
    }

    /// Look a node up by id
    pub fn node(&self, id: &str) -> Option<&GraphNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Iterate nodes of one kind, in first-seen order
    pub fn nodes_of_kind(&self, kind: NodeKind) -> impl Iterator<Item = &GraphNode> {
        self.nodes.iter().filter(move |n| n.kind == kind)
    }
}

/// Builds a [`KnowledgeGraph`] from an ordered sequence of entries.
///
/// The build is a full rebuild every time; there is no incremental-update
/// mode. Runtime is linear in the total number of (entry, tag) pairs.
pub struct GraphAssembler;

impl GraphAssembler {
    /// Assemble nodes and edges from entries, preserving input order.
    ///
    /// Exactly one node exists per distinct `(kind, canonical label)` pair,
    /// and at most one edge per `(culture node, target node)` pair. Entries
    /// with an empty culture cannot anchor edges and are skipped entirely;
    /// duplicate tags within one entry collapse before edge creation.
    pub fn assemble(entries: &[KnowledgeEntry]) -> KnowledgeGraph {
        let mut cultures: Vec<GraphNode> = Vec::new();
        let mut concepts: Vec<GraphNode> = Vec::new();
        let mut themes: Vec<GraphNode> = Vec::new();

        // Canonical label -> index into the kind's vec
        let mut culture_index: HashMap<String, usize> = HashMap::new();
        let mut concept_index: HashMap<String, usize> = HashMap::new();
        let mut theme_index: HashMap<String, usize> = HashMap::new();

        let mut edges: Vec<GraphEdge> = Vec::new();
        let mut edge_ids: HashSet<String> = HashSet::new();

        for entry in entries {
            if entry.culture.trim().is_empty() {
                continue;
            }

            let culture_label = entry.culture.clone();
            let culture_key = GraphNode::canonicalize(&culture_label);
            let culture_idx = *culture_index.entry(culture_key).or_insert_with(|| {
                cultures.push(GraphNode::new(NodeKind::Culture, culture_label.clone()));
                cultures.len() - 1
            });
            cultures[culture_idx].member_count += 1;
            let culture_id = cultures[culture_idx].id.clone();
            // The node's first-seen spelling, so case/whitespace variants of
            // one culture stay a single associated-cultures member
            let culture_label = cultures[culture_idx].label.clone();

            for concept in dedup_tags(&entry.concepts) {
                link_tag(
                    NodeKind::Concept,
                    concept,
                    &culture_id,
                    &culture_label,
                    EdgeRelation::HasConcept,
                    &mut concepts,
                    &mut concept_index,
                    &mut edges,
                    &mut edge_ids,
                );
            }

            for theme in dedup_tags(&entry.themes) {
                link_tag(
                    NodeKind::Theme,
                    theme,
                    &culture_id,
                    &culture_label,
                    EdgeRelation::HasTheme,
                    &mut themes,
                    &mut theme_index,
                    &mut edges,
                    &mut edge_ids,
                );
            }
        }

        let mut nodes = cultures;
        nodes.append(&mut concepts);
        nodes.append(&mut themes);

        KnowledgeGraph { nodes, edges }
    }
}

/// Deduplicate one entry's tags by canonical label, first-seen order,
/// dropping blanks
fn dedup_tags(tags: &[String]) -> Vec<&str> {
    let mut seen = HashSet::new();
    tags.iter()
        .map(String::as_str)
        .filter(|tag| !tag.trim().is_empty())
        .filter(|tag| seen.insert(GraphNode::canonicalize(tag)))
        .collect()
}

#[allow(clippy::too_many_arguments)]
fn link_tag(
    kind: NodeKind,
    label: &str,
    culture_id: &str,
    culture_label: &str,
    relation: EdgeRelation,
    nodes: &mut Vec<GraphNode>,
    index: &mut HashMap<String, usize>,
    edges: &mut Vec<GraphEdge>,
    edge_ids: &mut HashSet<String>,
) {
    let key = GraphNode::canonicalize(label);
    let idx = *index.entry(key).or_insert_with(|| {
        nodes.push(GraphNode::new(kind, label));
        nodes.len() - 1
    });

    let node = &mut nodes[idx];
    node.associated_cultures.insert(culture_label.to_string());

    let edge_id = GraphEdge::edge_id(culture_id, &node.id);
    if edge_ids.insert(edge_id) {
        edges.push(GraphEdge::new(culture_id, node.id.clone(), relation));
    }
}
