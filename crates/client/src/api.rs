//! HTTP client for the cultural-knowledge service

use crate::error::{ClientError, Result};
use crate::status::AgentNetworkStatus;
use griot_core::{AnswerResult, KnowledgeEntry, NewKnowledge};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, instrument};

const DEFAULT_API_URL: &str = "http://localhost:8000";

fn env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Client for every endpoint the knowledge service exposes
#[derive(Clone)]
pub struct ServiceClient {
    client: Client,
    base_url: String,
}

impl ServiceClient {
    /// Create a client against an explicit base URL
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
        }
    }

    /// Client configured from `GRIOT_API_URL`, defaulting to localhost
    pub fn from_env() -> Self {
        Self::new(env_or_default("GRIOT_API_URL", DEFAULT_API_URL))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Submit a question to the reasoning service
    #[instrument(skip(self, question))]
    pub async fn query(&self, question: &str) -> Result<AnswerResult> {
        let url = format!("{}/query", self.base_url);
        let request = QueryRequest { question };

        debug!("Submitting question ({} chars)", question.len());

        let response = self.client.post(&url).json(&request).send().await?;
        let result: AnswerResult = check(response).await?.json().await?;

        debug!(
            "Received answer with {} reasoning steps (web fallback: {})",
            result.reasoning_chain.len(),
            result.used_web_fallback
        );

        Ok(result)
    }

    /// List stored knowledge, optionally filtered by culture
    #[instrument(skip(self))]
    pub async fn list_knowledge(
        &self,
        culture: Option<&str>,
        limit: usize,
    ) -> Result<Vec<KnowledgeEntry>> {
        let url = format!("{}/knowledge/list", self.base_url);

        let mut request = self.client.get(&url).query(&[("limit", limit.to_string())]);
        if let Some(culture) = culture {
            request = request.query(&[("culture", culture)]);
        }

        let response = check(request.send().await?).await?;
        let body: KnowledgeListResponse = response.json().await?;

        debug!("Listed {} knowledge entries", body.knowledge.len());

        Ok(body.knowledge)
    }

    /// Fetch a single knowledge entry by id
    #[instrument(skip(self))]
    pub async fn get_knowledge(&self, id: &str) -> Result<KnowledgeEntry> {
        let url = format!("{}/knowledge/{}", self.base_url, id);
        let response = check(self.client.get(&url).send().await?).await?;
        Ok(response.json().await?)
    }

    /// List every culture known to the service
    #[instrument(skip(self))]
    pub async fn list_cultures(&self) -> Result<Vec<String>> {
        let url = format!("{}/cultures", self.base_url);
        let response = check(self.client.get(&url).send().await?).await?;
        let body: CulturesResponse = response.json().await?;
        Ok(body.cultures)
    }

    /// Ingest a text-only contribution; returns the stored entry's id when
    /// the service reports one
    #[instrument(skip(self, knowledge))]
    pub async fn ingest(&self, knowledge: &NewKnowledge) -> Result<Option<String>> {
        let url = format!("{}/knowledge/ingest", self.base_url);

        debug!(
            "Ingesting {} knowledge for culture '{}'",
            knowledge.category, knowledge.culture
        );

        let response = check(self.client.post(&url).json(knowledge).send().await?).await?;
        let receipt: IngestReceipt = response.json().await?;
        Ok(receipt.id)
    }

    /// Ingest a contribution that combines text with audio and/or image
    /// artifacts, as one multipart request
    #[allow(clippy::too_many_arguments)]
    #[instrument(skip(self, text, audio, image))]
    pub async fn ingest_multimodal(
        &self,
        text: Option<&str>,
        culture: &str,
        category: &str,
        source: Option<&str>,
        language: &str,
        audio: Option<(String, Vec<u8>)>,
        image: Option<(String, Vec<u8>)>,
    ) -> Result<Option<String>> {
        let url = format!("{}/multimodal/ingest", self.base_url);

        let mut form = Form::new()
            .text("culture", culture.to_string())
            .text("category", category.to_string())
            .text("language", language.to_string());
        if let Some(text) = text {
            form = form.text("text", text.to_string());
        }
        if let Some(source) = source {
            form = form.text("source", source.to_string());
        }
        if let Some((file_name, bytes)) = audio {
            form = form.part("audio_file", Part::bytes(bytes).file_name(file_name));
        }
        if let Some((file_name, bytes)) = image {
            form = form.part("image_file", Part::bytes(bytes).file_name(file_name));
        }

        let response = check(self.client.post(&url).multipart(form).send().await?).await?;
        let receipt: IngestReceipt = response.json().await.unwrap_or_default();
        Ok(receipt.id)
    }

    /// Transcribe an audio artifact into text
    #[instrument(skip(self, bytes))]
    pub async fn transcribe_audio(
        &self,
        bytes: Vec<u8>,
        file_name: &str,
        language: &str,
    ) -> Result<String> {
        let url = format!("{}/multimodal/transcribe", self.base_url);

        debug!("Transcribing {} ({} bytes)", file_name, bytes.len());

        let form = Form::new()
            .part("file", Part::bytes(bytes).file_name(file_name.to_string()))
            .text("language", language.to_string());

        let response = check(self.client.post(&url).multipart(form).send().await?).await?;
        let body: TranscriptionResponse = response.json().await?;
        Ok(body.transcription)
    }

    /// Analyze an image artifact, returning the service's description
    #[instrument(skip(self, bytes))]
    pub async fn analyze_image(&self, bytes: Vec<u8>, file_name: &str) -> Result<String> {
        let url = format!("{}/multimodal/analyze-image", self.base_url);

        debug!("Analyzing {} ({} bytes)", file_name, bytes.len());

        let form = Form::new().part("file", Part::bytes(bytes).file_name(file_name.to_string()));

        let response = check(self.client.post(&url).multipart(form).send().await?).await?;
        let body: ImageAnalysisResponse = response.json().await?;
        Ok(body.description)
    }

    /// Promote a web-sourced answer into permanent storage
    #[instrument(skip(self, content))]
    pub async fn promote_web_result(
        &self,
        content: &str,
        culture: &str,
        category: &str,
        source: &str,
        language: &str,
    ) -> Result<()> {
        let url = format!("{}/knowledge/add-from-web", self.base_url);

        let response = self
            .client
            .post(&url)
            .query(&[
                ("content", content),
                ("culture", culture),
                ("category", category),
                ("source", source),
                ("language", language),
            ])
            .send()
            .await?;

        check(response).await?;
        Ok(())
    }

    /// Current orchestrator/agent network snapshot
    #[instrument(skip(self))]
    pub async fn agent_status(&self) -> Result<AgentNetworkStatus> {
        let url = format!("{}/agents/status", self.base_url);
        let response = check(self.client.get(&url).send().await?).await?;
        Ok(response.json().await?)
    }

    /// Health check
    pub async fn health(&self) -> Result<bool> {
        let url = format!("{}/health", self.base_url);
        let response = self.client.get(&url).send().await?;
        Ok(response.status().is_success())
    }
}

/// Map non-2xx responses to [`ClientError::Service`], extracting the
/// structured `detail` field when the body carries one
async fn check(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let detail = match response.json::<Value>().await {
        Ok(body) => body
            .get("detail")
            .and_then(Value::as_str)
            .map(str::to_string),
        Err(_) => None,
    };

    Err(ClientError::Service {
        status: status.as_u16(),
        detail: detail.unwrap_or_else(|| format!("service returned status {}", status)),
    })
}

// ==========================================
// REQUEST/RESPONSE TYPES
// ==========================================

#[derive(Debug, Serialize)]
struct QueryRequest<'a> {
    question: &'a str,
}

#[derive(Debug, Deserialize)]
struct KnowledgeListResponse {
    #[serde(default)]
    knowledge: Vec<KnowledgeEntry>,
}

#[derive(Debug, Deserialize)]
struct CulturesResponse {
    #[serde(default)]
    cultures: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
struct IngestReceipt {
    #[serde(default)]
    id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TranscriptionResponse {
    #[serde(default)]
    transcription: String,
}

#[derive(Debug, Deserialize)]
struct ImageAnalysisResponse {
    #[serde(default)]
    description: String,
}
