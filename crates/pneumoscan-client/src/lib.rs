//! HTTP client for the external pneumonia inference service.
//!
//! Two endpoints are consumed:
//!   - `POST /analyze`: multipart upload, field `file`, returns an [`AnalysisResult`]
//!   - `POST /chat`   : JSON `{question}`, returns `{answer}`

use async_trait::async_trait;
use reqwest::{multipart, Client, Response};
use std::time::Duration;

use pneumoscan_common::models::ChatResponse;
use pneumoscan_common::{AnalysisResult, ChatRequest, PneumoscanError, Result, SelectedFile};
use pneumoscan_config::InferenceConfig;

/// The seam between the UI and the inference backend.
#[async_trait]
pub trait InferenceApi: Send + Sync {
    /// Upload an image for classification.
    async fn analyze(&self, file: &SelectedFile) -> Result<AnalysisResult>;

    /// Ask a free-text question; returns the backend's answer.
    async fn chat(&self, question: &str) -> Result<String>;
}

/// reqwest-backed [`InferenceApi`]. No retries, no auth headers.
pub struct InferenceClient {
    analyze_url: String,
    chat_url: String,
    client: Client,
}

impl InferenceClient {
    pub fn new(config: &InferenceConfig) -> Result<Self> {
        Self::with_urls(&config.analyze_url, &config.chat_url, config.timeout())
    }

    pub fn with_urls(analyze_url: &str, chat_url: &str, timeout: Duration) -> Result<Self> {
        Ok(Self {
            analyze_url: analyze_url.trim_end_matches('/').to_string(),
            chat_url: chat_url.trim_end_matches('/').to_string(),
            client: Client::builder().timeout(timeout).build()?,
        })
    }

    pub fn analyze_endpoint(&self) -> String {
        format!("{}/analyze", self.analyze_url)
    }

    pub fn chat_endpoint(&self) -> String {
        format!("{}/chat", self.chat_url)
    }
}

#[async_trait]
impl InferenceApi for InferenceClient {
    async fn analyze(&self, file: &SelectedFile) -> Result<AnalysisResult> {
        let part = multipart::Part::bytes(file.bytes.clone())
            .file_name(file.file_name.clone())
            .mime_str(&file.content_type)?;

        let form = multipart::Form::new().part("file", part);

        tracing::debug!(
            endpoint = %self.analyze_endpoint(),
            bytes = file.size(),
            "Uploading image for analysis"
        );

        let resp = self.client
            .post(self.analyze_endpoint())
            .multipart(form)
            .send()
            .await?;

        let resp = ensure_success(resp).await?;
        let result: AnalysisResult = resp.json().await?;
        Ok(result)
    }

    async fn chat(&self, question: &str) -> Result<String> {
        let resp = self.client
            .post(self.chat_endpoint())
            .json(&ChatRequest {
                question: question.to_string(),
            })
            .send()
            .await?;

        let resp = ensure_success(resp).await?;
        let body: ChatResponse = resp.json().await?;
        Ok(body.answer)
    }
}

/// Turn a non-2xx response into [`PneumoscanError::Backend`], keeping the body for the log.
async fn ensure_success(resp: Response) -> Result<Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    Err(PneumoscanError::Backend {
        status: status.as_u16(),
        body,
    })
}
