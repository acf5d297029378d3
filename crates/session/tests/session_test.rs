//! Integration tests for the session state machines
//!
//! All scenarios run against an in-memory backend fake, so no service
//! needs to be running.

use griot_client::ClientError;
use griot_core::AnswerResult;
use griot_session::{
    compare_concepts, Attachment, PromotionController, PromotionState, QueryBackend,
    QueryOrchestrator, SessionError, SessionStatus,
};
use std::sync::{Arc, Mutex};

/// Backend fake recording every call it receives
#[derive(Clone, Default)]
struct FakeBackend {
    calls: Arc<Mutex<Vec<String>>>,
    last_query: Arc<Mutex<Option<String>>>,
    transcript: String,
    analysis: String,
    fail_transcribe: bool,
    fail_analyze: bool,
    fail_query: bool,
    fail_promote: bool,
    web_fallback: bool,
}

impl FakeBackend {
    fn record(&self, call: &str) {
        self.calls.lock().unwrap().push(call.to_string());
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn service_error(detail: &str) -> ClientError {
        ClientError::Service {
            status: 500,
            detail: detail.into(),
        }
    }
}

impl QueryBackend for FakeBackend {
    async fn transcribe_audio(
        &self,
        _bytes: Vec<u8>,
        _file_name: &str,
        _language: &str,
    ) -> griot_client::Result<String> {
        self.record("transcribe");
        if self.fail_transcribe {
            return Err(Self::service_error("transcription failed"));
        }
        Ok(self.transcript.clone())
    }

    async fn analyze_image(
        &self,
        _bytes: Vec<u8>,
        _file_name: &str,
    ) -> griot_client::Result<String> {
        self.record("analyze");
        if self.fail_analyze {
            return Err(Self::service_error("image analysis failed"));
        }
        Ok(self.analysis.clone())
    }

    async fn query(&self, question: &str) -> griot_client::Result<AnswerResult> {
        self.record("query");
        if self.fail_query {
            return Err(Self::service_error("reasoning backend offline"));
        }
        *self.last_query.lock().unwrap() = Some(question.to_string());
        Ok(AnswerResult {
            answer: "Wisdom is the reward of experience".into(),
            cultural_context: vec!["Akan".into()],
            sources: vec!["proverb collection".into()],
            reasoning_chain: Vec::new(),
            used_web_fallback: self.web_fallback,
            web_result_data: None,
        })
    }

    async fn promote_web_result(
        &self,
        _content: &str,
        _culture: &str,
        _category: &str,
        _source: &str,
        _language: &str,
    ) -> griot_client::Result<()> {
        self.record("promote");
        if self.fail_promote {
            return Err(Self::service_error("storage rejected the entry"));
        }
        Ok(())
    }
}

fn wav(bytes: &[u8]) -> Attachment {
    Attachment::new("clip.wav", "audio/wav", bytes.to_vec())
}

fn jpeg() -> Attachment {
    Attachment::new("mask.jpg", "image/jpeg", vec![0xFF, 0xD8])
}

#[tokio::test]
async fn transcript_appends_to_existing_question() {
    let backend = FakeBackend {
        transcript: "tell me about Sankofa".into(),
        ..Default::default()
    };
    let mut orchestrator = QueryOrchestrator::new(backend);

    orchestrator.set_question("My question:");
    orchestrator.enrich(Some(wav(b"audio")), None, "en").await.unwrap();

    let session = orchestrator.session();
    assert_eq!(session.question, "My question:\ntell me about Sankofa");
    assert_eq!(session.transcript.as_deref(), Some("tell me about Sankofa"));
    assert_eq!(session.status, SessionStatus::Idle);
}

#[tokio::test]
async fn transcript_becomes_question_when_empty() {
    let backend = FakeBackend {
        transcript: "what does Ubuntu mean".into(),
        ..Default::default()
    };
    let mut orchestrator = QueryOrchestrator::new(backend);

    orchestrator.enrich(Some(wav(b"audio")), None, "en").await.unwrap();

    assert_eq!(orchestrator.session().question, "what does Ubuntu mean");
    assert!(orchestrator.session().submittable());
}

#[tokio::test]
async fn image_analysis_stays_hidden_behind_marker() {
    let backend = FakeBackend {
        analysis: "A carved wooden mask with geometric patterns".into(),
        ..Default::default()
    };
    let mut orchestrator = QueryOrchestrator::new(backend);

    orchestrator.set_question("What is this?");
    orchestrator.enrich(None, Some(jpeg()), "en").await.unwrap();

    let session = orchestrator.session();
    // Only the marker is visible; the analysis is held aside
    assert_eq!(session.question, "What is this? [image: mask.jpg]");
    assert_eq!(
        session.image_analysis.as_deref(),
        Some("A carved wooden mask with geometric patterns")
    );
}

#[tokio::test]
async fn enrichment_failures_are_independent() {
    let backend = FakeBackend {
        analysis: "A beaded crown".into(),
        fail_transcribe: true,
        ..Default::default()
    };
    let mut orchestrator = QueryOrchestrator::new(backend.clone());

    orchestrator.set_question("Describe this artifact");
    orchestrator
        .enrich(Some(wav(b"audio")), Some(jpeg()), "en")
        .await
        .unwrap();

    let session = orchestrator.session();
    // Transcription failed, but the image analysis landed and the session
    // is still submittable
    assert_eq!(session.error_message.as_deref(), Some("transcription failed"));
    assert!(session.image_analysis.is_some());
    assert!(session.submittable());
    assert_eq!(backend.calls().len(), 2);
}

#[tokio::test]
async fn composed_submission_truncates_image_context() {
    let backend = FakeBackend {
        analysis: "x".repeat(500),
        ..Default::default()
    };
    let mut orchestrator = QueryOrchestrator::new(backend.clone());

    orchestrator.set_question("What is shown here?");
    orchestrator.enrich(None, Some(jpeg()), "en").await.unwrap();
    orchestrator.submit().await.unwrap();

    let submitted = backend.last_query.lock().unwrap().clone().unwrap();
    let context = submitted
        .split("[Image context]: ")
        .nth(1)
        .expect("submission should carry the image-context block");

    assert!(context.ends_with("..."));
    assert_eq!(context.trim_end_matches("...").chars().count(), 300);
    // The visible part of the question still leads the submission
    assert!(submitted.starts_with("What is shown here?"));
}

#[tokio::test]
async fn empty_submission_rejected_before_network() {
    let backend = FakeBackend::default();
    let mut orchestrator = QueryOrchestrator::new(backend.clone());

    let err = orchestrator.submit().await.unwrap_err();

    assert!(matches!(err, SessionError::EmptySubmission));
    assert!(backend.calls().is_empty());
}

#[tokio::test]
async fn image_only_submission_is_accepted() {
    let backend = FakeBackend {
        analysis: "Kente cloth with gold thread".into(),
        ..Default::default()
    };
    let mut orchestrator = QueryOrchestrator::new(backend.clone());

    orchestrator.enrich(None, Some(jpeg()), "en").await.unwrap();
    // The question only carries the marker, but the analysis makes the
    // session submittable
    assert!(orchestrator.session().submittable());
    orchestrator.submit().await.unwrap();

    assert_eq!(orchestrator.session().status, SessionStatus::Succeeded);
}

#[tokio::test]
async fn failed_submission_records_service_detail() {
    let backend = FakeBackend {
        fail_query: true,
        ..Default::default()
    };
    let mut orchestrator = QueryOrchestrator::new(backend);

    orchestrator.set_question("Anything");
    let err = orchestrator.submit().await.unwrap_err();

    assert!(matches!(err, SessionError::Client(_)));
    let session = orchestrator.session();
    assert_eq!(session.status, SessionStatus::Failed);
    assert_eq!(
        session.error_message.as_deref(),
        Some("reasoning backend offline")
    );
}

#[tokio::test]
async fn finished_session_rejects_resubmission() {
    let backend = FakeBackend::default();
    let mut orchestrator = QueryOrchestrator::new(backend.clone());

    orchestrator.set_question("What does Sankofa teach?");
    orchestrator.submit().await.unwrap();
    assert_eq!(orchestrator.session().status, SessionStatus::Succeeded);

    // Succeeded is terminal: a second submit is refused before any network
    let err = orchestrator.submit().await.unwrap_err();
    assert!(matches!(err, SessionError::SessionFinished));
    assert_eq!(backend.calls(), vec!["query"]);

    // A fresh session submits again
    orchestrator.reset();
    orchestrator.set_question("And what of Ubuntu?");
    orchestrator.submit().await.unwrap();
    assert_eq!(backend.calls(), vec!["query", "query"]);
}

#[tokio::test]
async fn failed_session_requires_reset_before_resubmission() {
    let backend = FakeBackend {
        fail_query: true,
        ..Default::default()
    };
    let mut orchestrator = QueryOrchestrator::new(backend.clone());

    orchestrator.set_question("Anything");
    orchestrator.submit().await.unwrap_err();
    assert_eq!(orchestrator.session().status, SessionStatus::Failed);

    let err = orchestrator.submit().await.unwrap_err();
    assert!(matches!(err, SessionError::SessionFinished));
    assert_eq!(backend.calls(), vec!["query"]);
}

#[tokio::test]
async fn reset_starts_a_fresh_session() {
    let backend = FakeBackend::default();
    let mut orchestrator = QueryOrchestrator::new(backend);

    orchestrator.set_question("old question");
    let old_id = orchestrator.session().id;
    orchestrator.reset();

    let session = orchestrator.session();
    assert_ne!(session.id, old_id);
    assert!(session.question.is_empty());
    assert!(session.result.is_none());
    assert_eq!(session.status, SessionStatus::Idle);
}

#[tokio::test]
async fn promotion_only_offered_for_web_fallback() {
    let backend = FakeBackend::default();
    let curated = AnswerResult {
        answer: "From the curated store".into(),
        cultural_context: Vec::new(),
        sources: Vec::new(),
        reasoning_chain: Vec::new(),
        used_web_fallback: false,
        web_result_data: None,
    };

    assert!(PromotionController::for_answer(backend, &curated).is_none());
}

#[tokio::test]
async fn promotion_requires_a_culture() {
    let backend = FakeBackend::default();
    let answer = web_answer();
    let mut controller = PromotionController::for_answer(backend.clone(), &answer).unwrap();

    controller.reveal();
    let err = controller.submit("   ", None, None).await.unwrap_err();

    assert!(matches!(err, SessionError::Validation(_)));
    assert!(backend.calls().is_empty());
    assert_eq!(controller.state(), PromotionState::Open);
}

#[tokio::test]
async fn promotion_is_idempotent_per_answer() {
    let backend = FakeBackend::default();
    let answer = web_answer();
    let mut controller = PromotionController::for_answer(backend.clone(), &answer).unwrap();

    controller.reveal();
    controller.submit("Hausa", Some("ethics"), None).await.unwrap();
    assert_eq!(controller.state(), PromotionState::Added);
    assert_eq!(backend.calls(), vec!["promote".to_string()]);

    // Second submit is rejected without reaching the network
    let err = controller.submit("Hausa", None, None).await.unwrap_err();
    assert!(matches!(err, SessionError::Validation(_)));
    assert_eq!(backend.calls(), vec!["promote".to_string()]);
}

#[tokio::test]
async fn failed_promotion_leaves_form_open_for_retry() {
    let mut backend = FakeBackend::default();
    backend.fail_promote = true;
    let answer = web_answer();
    let mut controller = PromotionController::for_answer(backend.clone(), &answer).unwrap();

    controller.reveal();
    let err = controller.submit("Zulu", None, None).await.unwrap_err();

    assert!(matches!(err, SessionError::Client(_)));
    assert_eq!(controller.state(), PromotionState::Open);
    assert_eq!(
        controller.error_message(),
        Some("storage rejected the entry")
    );
}

#[tokio::test]
async fn promotion_form_is_prefilled_from_answer() {
    let backend = FakeBackend::default();
    let answer = web_answer();
    let controller = PromotionController::for_answer(backend, &answer).unwrap();

    let form = controller.form();
    assert_eq!(form.content, "Found on the open web");
    assert_eq!(form.source, "Web search result");
    assert_eq!(form.category, "proverb");
    assert_eq!(controller.state(), PromotionState::Hidden);
}

#[tokio::test]
async fn comparison_queries_both_concepts() {
    let backend = FakeBackend::default();

    let comparison = compare_concepts(&backend, "Ubuntu", "Sankofa")
        .await
        .unwrap();

    assert_eq!(backend.calls(), vec!["query", "query"]);
    assert_eq!(comparison.first.concept, "Ubuntu");
    assert_eq!(comparison.second.concept, "Sankofa");
    assert!(!comparison.first.answer.answer.is_empty());
    assert!(!comparison.second.answer.answer.is_empty());
}

#[tokio::test]
async fn comparison_rejects_blank_concept_before_network() {
    let backend = FakeBackend::default();

    let err = compare_concepts(&backend, "Ubuntu", "  ").await.unwrap_err();

    assert!(matches!(err, SessionError::Validation(_)));
    assert!(backend.calls().is_empty());
}

#[tokio::test]
async fn comparison_fails_when_a_query_fails() {
    let backend = FakeBackend {
        fail_query: true,
        ..Default::default()
    };

    let err = compare_concepts(&backend, "Ubuntu", "Sankofa")
        .await
        .unwrap_err();

    assert!(matches!(err, SessionError::Client(_)));
}

fn web_answer() -> AnswerResult {
    AnswerResult {
        answer: "Found on the open web".into(),
        cultural_context: Vec::new(),
        sources: Vec::new(),
        reasoning_chain: Vec::new(),
        used_web_fallback: true,
        web_result_data: Some(serde_json::json!({"url": "https://example.org"})),
    }
}
