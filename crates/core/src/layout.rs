//! Deterministic graph layout
//!
//! Culture nodes sit on a fixed circle in first-seen order; concept and
//! theme nodes scatter inside a rectangle at positions derived from a hash
//! of their own id. Re-assembling the same entries therefore always
//! reproduces the same picture, which snapshot tests rely on.

use crate::assembler::KnowledgeGraph;
use crate::node::{NodeKind, Point};

/// Circle the culture nodes are placed on
const CIRCLE_RADIUS: f64 = 400.0;
const CIRCLE_ORIGIN: (f64, f64) = (500.0, 400.0);

/// Scatter region for concept and theme nodes
const SCATTER_X: (f64, f64) = (200.0, 1000.0);
const SCATTER_Y: (f64, f64) = (100.0, 700.0);

pub struct LayoutEngine;

impl LayoutEngine {
    /// Assign a position to every node in the graph.
    ///
    /// Layout never moves existing nodes on its own; callers extend a graph
    /// by rebuilding it wholesale and laying the result out again.
    pub fn layout(graph: &mut KnowledgeGraph) {
        let culture_count = graph.culture_count().max(1);

        let mut culture_seq = 0usize;
        for node in &mut graph.nodes {
            node.position = match node.kind {
                NodeKind::Culture => {
                    let position = circle_position(culture_seq, culture_count);
                    culture_seq += 1;
                    position
                }
                NodeKind::Concept | NodeKind::Theme => scatter_position(&node.id),
            };
        }
    }
}

/// The i-th of n culture nodes, evenly spaced on the circle
fn circle_position(index: usize, total: usize) -> Point {
    let angle = 2.0 * std::f64::consts::PI * index as f64 / total as f64;
    Point {
        x: angle.cos() * CIRCLE_RADIUS + CIRCLE_ORIGIN.0,
        y: angle.sin() * CIRCLE_RADIUS + CIRCLE_ORIGIN.1,
    }
}

/// Pseudo-random but reproducible position seeded by the node id
fn scatter_position(id: &str) -> Point {
    let hash = fnv1a(id.as_bytes());
    // Split the hash into two independent 32-bit lanes, one per axis
    let x_lane = (hash & 0xFFFF_FFFF) as f64 / u32::MAX as f64;
    let y_lane = (hash >> 32) as f64 / u32::MAX as f64;
    Point {
        x: SCATTER_X.0 + x_lane * (SCATTER_X.1 - SCATTER_X.0),
        y: SCATTER_Y.0 + y_lane * (SCATTER_Y.1 - SCATTER_Y.0),
    }
}

/// 64-bit FNV-1a; stable across platforms and runs, unlike the std hasher
fn fnv1a(bytes: &[u8]) -> u64 {
    let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
    for byte in bytes {
        hash ^= u64::from(*byte);
        hash = hash.wrapping_mul(0x0000_0100_0000_01b3);
    }
    hash
}
