//! Answer types returned by the reasoning service

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One step of the service's reasoning chain
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReasoningStep {
    /// Machine name of the step, e.g. `identify_relevant_knowledge`
    #[serde(default)]
    pub action: String,

    /// Human-readable outcome of the step
    #[serde(default)]
    pub result: String,

    /// Supporting details (knowledge ids, matched patterns, ...)
    #[serde(default)]
    pub details: Vec<Value>,
}

impl ReasoningStep {
    /// Title-case the action name for display (`apply_reasoning_rules`
    /// becomes `Apply Reasoning Rules`)
    pub fn display_action(&self) -> String {
        self.action
            .split('_')
            .filter(|word| !word.is_empty())
            .map(|word| {
                let mut chars = word.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                    None => String::new(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// A complete answer to a submitted question.
///
/// Missing fields are absorbed as empty collections so a partial response
/// still renders; `used_web_fallback` marks answers synthesized from an
/// external source rather than the curated store, which makes them eligible
/// for promotion into permanent storage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnswerResult {
    #[serde(default)]
    pub answer: String,

    #[serde(default)]
    pub cultural_context: Vec<String>,

    #[serde(default)]
    pub sources: Vec<String>,

    #[serde(default)]
    pub reasoning_chain: Vec<ReasoningStep>,

    #[serde(default)]
    pub used_web_fallback: bool,

    #[serde(default)]
    pub web_result_data: Option<Value>,
}
