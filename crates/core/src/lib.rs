//! Core domain types for the griot cultural-knowledge client
//!
//! This crate defines the data structures shared across the application
//! (knowledge entries, graph nodes and edges, answers) together with the
//! two pure transformations at the heart of the client: assembling a
//! deduplicated knowledge graph from flat entries, and laying it out
//! deterministically.

pub mod answer;
pub mod assembler;
pub mod edge;
pub mod entry;
pub mod error;
pub mod layout;
pub mod node;

pub use answer::{AnswerResult, ReasoningStep};
pub use assembler::{GraphAssembler, KnowledgeGraph};
pub use edge::{EdgeRelation, GraphEdge};
pub use entry::{KnowledgeEntry, NewKnowledge, CATEGORIES};
pub use error::{CoreError, Result};
pub use layout::LayoutEngine;
pub use node::{GraphNode, NodeKind, Point};
