//! Promotion of web-sourced answers into permanent storage
//!
//! Answers marked `used_web_fallback` came from a general source rather
//! than the curated store. The promotion controller drives the one-shot
//! flow of filing such an answer as a proper knowledge entry.

use crate::backend::QueryBackend;
use crate::error::{Result, SessionError};
use griot_core::AnswerResult;
use tracing::info;

const DEFAULT_SOURCE: &str = "Web search result";
const DEFAULT_CATEGORY: &str = "proverb";

/// The editable promotion form, pre-filled from the answer
#[derive(Debug, Clone)]
pub struct PromotionForm {
    pub content: String,
    pub culture: String,
    pub category: String,
    pub source: String,
}

/// Where the promotion flow stands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromotionState {
    /// Collapsed hint; form not shown
    Hidden,
    /// Form open for editing
    Open,
    /// Terminal: the answer has been stored; further submits are rejected
    Added,
}

/// Drives promotion of a single web-fallback answer.
///
/// At most one successful promotion happens per answer: once `Added`, the
/// controller rejects further submits without touching the network.
pub struct PromotionController<B: QueryBackend> {
    backend: B,
    form: PromotionForm,
    state: PromotionState,
    error_message: Option<String>,
}

impl<B: QueryBackend> PromotionController<B> {
    /// Build a controller for an answer, or `None` when the answer came
    /// from the curated store and there is nothing to promote
    pub fn for_answer(backend: B, answer: &AnswerResult) -> Option<Self> {
        if !answer.used_web_fallback {
            return None;
        }
        Some(Self {
            backend,
            form: PromotionForm {
                content: answer.answer.clone(),
                culture: String::new(),
                category: DEFAULT_CATEGORY.into(),
                source: DEFAULT_SOURCE.into(),
            },
            state: PromotionState::Hidden,
            error_message: None,
        })
    }

    pub fn state(&self) -> PromotionState {
        self.state
    }

    pub fn form(&self) -> &PromotionForm {
        &self.form
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    /// Show the pre-filled form
    pub fn reveal(&mut self) {
        if self.state == PromotionState::Hidden {
            self.state = PromotionState::Open;
        }
    }

    /// Hide the form without promoting
    pub fn dismiss(&mut self) {
        if self.state == PromotionState::Open {
            self.state = PromotionState::Hidden;
        }
    }

    /// Promote the answer under the given culture/category/source.
    ///
    /// An empty culture is rejected before any network call. On failure the
    /// form stays open for retry; on success the controller is terminal.
    pub async fn submit(
        &mut self,
        culture: &str,
        category: Option<&str>,
        source: Option<&str>,
    ) -> Result<()> {
        if self.state == PromotionState::Added {
            return Err(SessionError::Validation(
                "this answer has already been added to the knowledge base".into(),
            ));
        }
        if culture.trim().is_empty() {
            return Err(SessionError::Validation("please specify the culture".into()));
        }

        self.form.culture = culture.trim().to_string();
        if let Some(category) = category {
            self.form.category = category.to_string();
        }
        if let Some(source) = source {
            self.form.source = source.to_string();
        }

        let outcome = self
            .backend
            .promote_web_result(
                &self.form.content,
                &self.form.culture,
                &self.form.category,
                &self.form.source,
                "en",
            )
            .await;

        match outcome {
            Ok(()) => {
                info!("Promoted web result under culture '{}'", self.form.culture);
                self.state = PromotionState::Added;
                self.error_message = None;
                Ok(())
            }
            Err(e) => {
                // Keep the form open so the user can retry
                self.error_message = Some(e.detail());
                Err(e.into())
            }
        }
    }
}
