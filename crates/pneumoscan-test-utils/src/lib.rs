//! Shared testing utilities: a recording in-memory inference backend,
//! canned payloads, and a helper to serve a router on an ephemeral port.

use std::net::SocketAddr;
use std::sync::Mutex;

use async_trait::async_trait;
use pneumoscan_client::InferenceApi;
use pneumoscan_common::{AnalysisResult, PneumoscanError, Result, SelectedFile, StructuredReport};

/// What a mocked endpoint answers with.
#[derive(Debug, Clone)]
pub enum Canned<T> {
    Ok(T),
    /// Fail as if the backend returned this HTTP status.
    Status(u16),
}

impl<T: Clone> Canned<T> {
    fn resolve(&self) -> Result<T> {
        match self {
            Canned::Ok(value) => Ok(value.clone()),
            Canned::Status(status) => Err(PneumoscanError::Backend {
                status: *status,
                body: "mocked failure".to_string(),
            }),
        }
    }
}

/// In-memory [`InferenceApi`] that records every call it receives.
pub struct MockInference {
    analysis: Canned<AnalysisResult>,
    answer: Canned<String>,
    analyze_calls: Mutex<Vec<SelectedFile>>,
    chat_calls: Mutex<Vec<String>>,
}

impl Default for MockInference {
    fn default() -> Self {
        Self::new()
    }
}

impl MockInference {
    pub fn new() -> Self {
        Self {
            analysis: Canned::Ok(pneumonia_result()),
            answer: Canned::Ok("Pneumonia is an infection that inflames the air sacs.".to_string()),
            analyze_calls: Mutex::new(Vec::new()),
            chat_calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_analysis(mut self, result: AnalysisResult) -> Self {
        self.analysis = Canned::Ok(result);
        self
    }

    pub fn with_analysis_status(mut self, status: u16) -> Self {
        self.analysis = Canned::Status(status);
        self
    }

    pub fn with_answer(mut self, answer: impl Into<String>) -> Self {
        self.answer = Canned::Ok(answer.into());
        self
    }

    pub fn with_chat_status(mut self, status: u16) -> Self {
        self.answer = Canned::Status(status);
        self
    }

    pub fn analyze_calls(&self) -> Vec<SelectedFile> {
        self.analyze_calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    pub fn chat_calls(&self) -> Vec<String> {
        self.chat_calls.lock().map(|c| c.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl InferenceApi for MockInference {
    async fn analyze(&self, file: &SelectedFile) -> Result<AnalysisResult> {
        if let Ok(mut calls) = self.analyze_calls.lock() {
            calls.push(file.clone());
        }
        self.analysis.resolve()
    }

    async fn chat(&self, question: &str) -> Result<String> {
        if let Ok(mut calls) = self.chat_calls.lock() {
            calls.push(question.to_string());
        }
        self.answer.resolve()
    }
}

/// A complete `/analyze` payload.
pub fn pneumonia_result() -> AnalysisResult {
    AnalysisResult {
        diagnosis: Some("Pneumonia".to_string()),
        confidence: Some("92%".to_string()),
        blip_report: Some(
            "an x-ray image of a chest with a white opacity in the lower lobe".to_string(),
        ),
        structured_report: Some(StructuredReport {
            biological_causes: Some("Streptococcus pneumoniae infection".to_string()),
            pathological_analysis: Some(
                "Alveolar consolidation in the right lower lobe".to_string(),
            ),
            environmental_factors: Some("Exposure to tobacco smoke".to_string()),
        }),
    }
}

/// Smallest byte sequence that starts like a PNG; the UI never decodes it.
pub fn png_bytes() -> Vec<u8> {
    vec![0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a]
}

/// Serve `router` on 127.0.0.1 with an OS-assigned port and return its address.
pub async fn serve(router: axum::Router) -> anyhow::Result<SocketAddr> {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });
    Ok(addr)
}
