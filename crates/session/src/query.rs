//! Query orchestration - enrichment, composition, and submission
//!
//! One [`QuerySession`] covers one submission: the user's question text,
//! optional audio/image enrichment, and the final answer or error. A new
//! question starts a fresh session; results from an abandoned session are
//! recognized by id and dropped.

use crate::backend::QueryBackend;
use crate::capture::Attachment;
use crate::error::{Result, SessionError};
use griot_core::AnswerResult;
use tracing::{debug, info};
use uuid::Uuid;

/// Longest image-analysis excerpt embedded into a submitted query
const IMAGE_CONTEXT_LIMIT: usize = 300;
const IMAGE_CONTEXT_DELIMITER: &str = "[Image context]: ";

/// Where a query session stands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    Idle,
    AwaitingEnrichment,
    Composing,
    Submitting,
    Succeeded,
    Failed,
}

/// State for one question, from first keystroke to answer
#[derive(Debug, Clone)]
pub struct QuerySession {
    pub id: Uuid,
    /// The visible, editable question text
    pub question: String,
    /// Transcript returned by audio enrichment, if any
    pub transcript: Option<String>,
    /// Full image analysis, kept out of the visible question; only a short
    /// `[image: ...]` marker appears in the editable text
    pub image_analysis: Option<String>,
    pub status: SessionStatus,
    pub result: Option<AnswerResult>,
    pub error_message: Option<String>,
}

impl QuerySession {
    fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            question: String::new(),
            transcript: None,
            image_analysis: None,
            status: SessionStatus::Idle,
            result: None,
            error_message: None,
        }
    }

    /// Whether submit would be accepted right now
    pub fn submittable(&self) -> bool {
        (!self.question.trim().is_empty() || self.image_analysis.is_some())
            && self.status != SessionStatus::Submitting
    }
}

impl Default for QuerySession {
    fn default() -> Self {
        Self::new()
    }
}

/// Drives a [`QuerySession`] through enrichment and submission
pub struct QueryOrchestrator<B: QueryBackend> {
    backend: B,
    session: QuerySession,
}

impl<B: QueryBackend> QueryOrchestrator<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            session: QuerySession::new(),
        }
    }

    pub fn session(&self) -> &QuerySession {
        &self.session
    }

    /// Replace the visible question text
    pub fn set_question(&mut self, text: impl Into<String>) {
        self.session.question = text.into();
    }

    /// Abandon the current session and start a fresh one. In-flight
    /// enrichment results for the old session are dropped by id.
    pub fn reset(&mut self) {
        self.session = QuerySession::new();
    }

    /// Run audio and/or image enrichment for the current session.
    ///
    /// Both calls proceed concurrently and fail independently: a failed
    /// transcription still leaves the session submittable on text alone,
    /// and vice versa. On success the transcript joins the visible question
    /// text, while the image analysis is stored aside with only a short
    /// marker made visible.
    pub async fn enrich(
        &mut self,
        audio: Option<Attachment>,
        image: Option<Attachment>,
        language: &str,
    ) -> Result<()> {
        if audio.is_none() && image.is_none() {
            return Ok(());
        }

        let session_id = self.session.id;
        self.session.status = SessionStatus::AwaitingEnrichment;

        let backend = self.backend.clone();
        let transcription = async {
            match audio {
                Some(attachment) => Some(
                    backend
                        .transcribe_audio(attachment.bytes, &attachment.file_name, language)
                        .await,
                ),
                None => None,
            }
        };

        let backend = self.backend.clone();
        let analysis = async {
            match image {
                Some(attachment) => {
                    let file_name = attachment.file_name.clone();
                    let outcome = backend.analyze_image(attachment.bytes, &file_name).await;
                    Some((file_name, outcome))
                }
                None => None,
            }
        };

        // No ordering guarantee between the two enrichment calls
        let (transcription, analysis) = tokio::join!(transcription, analysis);

        if let Some(outcome) = transcription {
            self.apply_transcript(session_id, outcome);
        }
        if let Some((file_name, outcome)) = analysis {
            self.apply_image_analysis(session_id, &file_name, outcome);
        }

        if self.session.id == session_id {
            self.session.status = SessionStatus::Idle;
        }
        Ok(())
    }

    /// Submit the composed question. Rejected before any network call when
    /// there is neither question text nor stored image analysis, while a
    /// submission is already in flight, or once the session has reached a
    /// terminal state (`reset` starts a fresh one).
    pub async fn submit(&mut self) -> Result<&AnswerResult> {
        match self.session.status {
            SessionStatus::Submitting => return Err(SessionError::Busy),
            SessionStatus::Succeeded | SessionStatus::Failed => {
                return Err(SessionError::SessionFinished)
            }
            _ => {}
        }
        if self.session.question.trim().is_empty() && self.session.image_analysis.is_none() {
            return Err(SessionError::EmptySubmission);
        }

        self.session.status = SessionStatus::Composing;
        let composed = self.composed_question();
        self.session.status = SessionStatus::Submitting;
        self.session.error_message = None;

        info!("Submitting question ({} chars composed)", composed.len());

        match self.backend.query(&composed).await {
            Ok(result) => {
                self.session.status = SessionStatus::Succeeded;
                Ok(self.session.result.insert(result))
            }
            Err(e) => {
                self.session.status = SessionStatus::Failed;
                self.session.error_message = Some(e.detail());
                Err(e.into())
            }
        }
    }

    /// The exact text a submission would carry: the visible question plus,
    /// when an image analysis is stored, a delimited context block capped at
    /// 300 characters
    pub fn composed_question(&self) -> String {
        let mut composed = self.session.question.trim().to_string();
        if let Some(analysis) = &self.session.image_analysis {
            if !composed.is_empty() {
                composed.push_str("\n\n");
            }
            composed.push_str(IMAGE_CONTEXT_DELIMITER);
            composed.push_str(&truncate_ellipsis(analysis, IMAGE_CONTEXT_LIMIT));
        }
        composed
    }

    fn apply_transcript(
        &mut self,
        session_id: Uuid,
        outcome: griot_client::Result<String>,
    ) {
        if self.session.id != session_id {
            debug!("Dropping transcript for stale session {}", session_id);
            return;
        }
        match outcome {
            Ok(transcript) => {
                if self.session.question.trim().is_empty() {
                    self.session.question = transcript.clone();
                } else {
                    self.session.question.push('\n');
                    self.session.question.push_str(&transcript);
                }
                self.session.transcript = Some(transcript);
            }
            Err(e) => {
                // Session stays submittable on text alone
                self.session.error_message = Some(e.detail());
            }
        }
    }

    fn apply_image_analysis(
        &mut self,
        session_id: Uuid,
        file_name: &str,
        outcome: griot_client::Result<String>,
    ) {
        if self.session.id != session_id {
            debug!("Dropping image analysis for stale session {}", session_id);
            return;
        }
        match outcome {
            Ok(analysis) => {
                let marker = format!("[image: {}]", file_name);
                if self.session.question.trim().is_empty() {
                    self.session.question = marker;
                } else {
                    self.session.question.push(' ');
                    self.session.question.push_str(&marker);
                }
                self.session.image_analysis = Some(analysis);
            }
            Err(e) => {
                self.session.error_message = Some(e.detail());
            }
        }
    }
}

/// Cap a string at `limit` characters, marking the cut with an ellipsis
fn truncate_ellipsis(text: &str, limit: usize) -> String {
    if text.chars().count() <= limit {
        return text.to_string();
    }
    let mut truncated: String = text.chars().take(limit).collect();
    truncated.push_str("...");
    truncated
}
