//! Knowledge entries - the atomic units of cultural content

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Categories a knowledge entry may belong to, as understood by the service
pub const CATEGORIES: &[&str] = &[
    "proverb",
    "story",
    "ritual",
    "medicine",
    "governance",
    "ethics",
    "philosophy",
    "art",
];

/// One stored unit of cultural knowledge, as returned by the service.
///
/// Every collection-valued field defaults to empty on deserialization so a
/// response missing optional fields never fails to parse.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KnowledgeEntry {
    /// Service-assigned identifier
    #[serde(default)]
    pub id: Option<String>,

    /// The culture this knowledge originates from
    #[serde(default)]
    pub culture: String,

    /// The knowledge text itself
    #[serde(default)]
    pub content: String,

    /// Category (proverb, story, ritual, ...)
    #[serde(default)]
    pub category: String,

    /// Concept tags extracted by the service
    #[serde(default)]
    pub concepts: Vec<String>,

    /// Theme tags extracted by the service
    #[serde(default)]
    pub themes: Vec<String>,

    /// Where the knowledge came from (elder's teaching, text, ...)
    #[serde(default)]
    pub source: Option<String>,

    /// Language code of the content
    #[serde(default)]
    pub language: Option<String>,

    /// Symbolic encoding the backend derived from the content
    #[serde(default)]
    pub symbolic_representation: Option<String>,

    /// Content hash in decentralized storage, when pinned
    #[serde(default)]
    pub ipfs_hash: Option<String>,

    /// When the entry was stored
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl KnowledgeEntry {
    /// Create an entry with the fields the graph assembler cares about
    pub fn new(culture: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: None,
            culture: culture.into(),
            content: content.into(),
            category: "proverb".into(),
            concepts: Vec::new(),
            themes: Vec::new(),
            source: None,
            language: None,
            symbolic_representation: None,
            ipfs_hash: None,
            created_at: None,
        }
    }

    /// Builder: set category
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    /// Builder: set concept tags
    pub fn with_concepts(mut self, concepts: Vec<String>) -> Self {
        self.concepts = concepts;
        self
    }

    /// Builder: set theme tags
    pub fn with_themes(mut self, themes: Vec<String>) -> Self {
        self.themes = themes;
        self
    }
}

/// A new contribution on its way to the service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewKnowledge {
    pub content: String,
    pub culture: String,
    pub category: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    pub language: String,
}

impl NewKnowledge {
    pub fn new(
        content: impl Into<String>,
        culture: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        Self {
            content: content.into(),
            culture: culture.into(),
            category: category.into(),
            source: None,
            language: "en".into(),
        }
    }

    /// Builder: set source attribution
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Builder: set language code
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }
}
