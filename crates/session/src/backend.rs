//! The seam between session logic and the HTTP client

use griot_client::{Result, ServiceClient};
use griot_core::AnswerResult;

/// The subset of service operations the session workflows need.
///
/// [`ServiceClient`] implements it for real use; tests substitute in-memory
/// fakes so the state machines run without a network.
pub trait QueryBackend: Clone + Send + Sync + 'static {
    fn transcribe_audio(
        &self,
        bytes: Vec<u8>,
        file_name: &str,
        language: &str,
    ) -> impl std::future::Future<Output = Result<String>> + Send;

    fn analyze_image(
        &self,
        bytes: Vec<u8>,
        file_name: &str,
    ) -> impl std::future::Future<Output = Result<String>> + Send;

    fn query(&self, question: &str) -> impl std::future::Future<Output = Result<AnswerResult>> + Send;

    fn promote_web_result(
        &self,
        content: &str,
        culture: &str,
        category: &str,
        source: &str,
        language: &str,
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

impl QueryBackend for ServiceClient {
    async fn transcribe_audio(
        &self,
        bytes: Vec<u8>,
        file_name: &str,
        language: &str,
    ) -> Result<String> {
        ServiceClient::transcribe_audio(self, bytes, file_name, language).await
    }

    async fn analyze_image(&self, bytes: Vec<u8>, file_name: &str) -> Result<String> {
        ServiceClient::analyze_image(self, bytes, file_name).await
    }

    async fn query(&self, question: &str) -> Result<AnswerResult> {
        ServiceClient::query(self, question).await
    }

    async fn promote_web_result(
        &self,
        content: &str,
        culture: &str,
        category: &str,
        source: &str,
        language: &str,
    ) -> Result<()> {
        ServiceClient::promote_web_result(self, content, culture, category, source, language).await
    }
}
