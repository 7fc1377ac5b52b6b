//! Page-local view state for the upload-and-display and chat flows.
//!
//! Both flows follow `idle → loading → (success | error)`. A new file or a
//! new submission always clears the previous result and error first, and a
//! flow refuses to start a second request while one is outstanding.

use crate::error::{PneumoscanError, Result};
use crate::models::{AnalysisResult, ChatAnswer, SelectedFile};

/// User-facing messages. The error taxonomy shown to users is deliberately flat.
pub mod messages {
    pub const FILE_MISSING: &str = "Please select a file to upload.";
    pub const NOT_AN_IMAGE: &str = "Please select an image file.";
    pub const ANALYSIS_FAILED: &str = "An error occurred while processing the image. Please try again.";
    pub const ANALYSIS_FAILED_SHORT: &str = "Failed to analyze image. Please try again.";
    pub const QUESTION_EMPTY: &str = "Please enter a question to ask.";
    pub const NO_DIAGNOSIS: &str = "Run an analysis before asking a question.";
    pub const CHAT_FAILED: &str = "An error occurred while fetching the answer. Please try again.";
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FlowState {
    #[default]
    Idle,
    Loading,
    Success(AnalysisResult),
    Failed(String),
}

// ---------------------------------------------------------------------------
// Upload flow
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct UploadFlow {
    file: Option<SelectedFile>,
    state: FlowState,
    failure_text: &'static str,
}

impl UploadFlow {
    /// `failure_text` is the page's wording for a failed backend request.
    pub fn new(failure_text: &'static str) -> Self {
        Self {
            file: None,
            state: FlowState::Idle,
            failure_text,
        }
    }

    /// Replace the selected file. Any displayed result or error is cleared.
    pub fn select_file(&mut self, file: SelectedFile) {
        self.file = Some(file);
        self.state = FlowState::Idle;
    }

    /// Validate the selection and enter `Loading`.
    ///
    /// On success the caller owns the one in-flight request for this form and
    /// must report back through [`UploadFlow::finish`].
    pub fn begin(&mut self) -> Result<&SelectedFile> {
        if self.is_loading() {
            return Err(PneumoscanError::Busy);
        }

        let Some(file) = self.file.as_ref() else {
            self.state = FlowState::Failed(messages::FILE_MISSING.to_string());
            return Err(PneumoscanError::FileMissing);
        };

        if !file.is_image() {
            let content_type = file.content_type.clone();
            self.state = FlowState::Failed(messages::NOT_AN_IMAGE.to_string());
            return Err(PneumoscanError::NotAnImage(content_type));
        }

        self.state = FlowState::Loading;
        Ok(file)
    }

    /// Record the backend outcome. Outcomes arriving outside `Loading` are stale and dropped.
    pub fn finish(&mut self, outcome: Result<AnalysisResult>) {
        if !self.is_loading() {
            tracing::debug!("Discarding analysis outcome for a flow that is not loading");
            return;
        }
        self.state = match outcome {
            Ok(result) => FlowState::Success(result),
            Err(e) => {
                tracing::debug!("Analysis failed: {e}");
                FlowState::Failed(self.failure_text.to_string())
            }
        };
    }

    pub fn state(&self) -> &FlowState {
        &self.state
    }

    pub fn file(&self) -> Option<&SelectedFile> {
        self.file.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, FlowState::Loading)
    }

    pub fn result(&self) -> Option<&AnalysisResult> {
        match &self.state {
            FlowState::Success(result) => Some(result),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match &self.state {
            FlowState::Failed(message) => Some(message),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Chat flow
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct ChatFlow {
    draft: String,
    answer: Option<ChatAnswer>,
    error: Option<String>,
    loading: bool,
}

impl ChatFlow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate a question against the page's analysis and enter `Loading`.
    /// Returns the trimmed question to send.
    pub fn begin(&mut self, question: &str, analysis: Option<&AnalysisResult>) -> Result<String> {
        if self.loading {
            return Err(PneumoscanError::Busy);
        }

        self.draft = question.to_string();
        self.answer = None;
        self.error = None;

        if !analysis.is_some_and(AnalysisResult::has_diagnosis) {
            self.error = Some(messages::NO_DIAGNOSIS.to_string());
            return Err(PneumoscanError::NoDiagnosis);
        }

        let trimmed = question.trim();
        if trimmed.is_empty() {
            self.error = Some(messages::QUESTION_EMPTY.to_string());
            return Err(PneumoscanError::QuestionEmpty);
        }

        self.loading = true;
        Ok(trimmed.to_string())
    }

    pub fn finish(&mut self, outcome: Result<String>) {
        if !self.loading {
            return;
        }
        self.loading = false;
        match outcome {
            Ok(answer) => {
                self.answer = Some(ChatAnswer {
                    question: self.draft.trim().to_string(),
                    answer,
                });
            }
            Err(e) => {
                tracing::debug!("Chat failed: {e}");
                self.error = Some(messages::CHAT_FAILED.to_string());
            }
        }
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn answer(&self) -> Option<&ChatAnswer> {
        self.answer.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }
}
