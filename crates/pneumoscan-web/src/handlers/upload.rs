//! Upload-and-display flow shared by the dashboard, analysis and student pages.
//!
//! GET renders the idle page; POST (multipart, field `file`) validates the
//! upload, forwards it to the inference backend and renders the outcome.

use axum::{
    extract::{multipart::MultipartError, Multipart, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    Form,
};
use serde::{Deserialize, Serialize};
use tracing::Instrument;
use uuid::Uuid;

use pneumoscan_common::flow::messages;
use pneumoscan_common::report::{render_plain_report, report_file_name};
use pneumoscan_common::{
    AnalysisResult, ChatFlow, FlowState, PneumoscanError, SelectedFile, StructuredReport,
    UploadFlow,
};

use crate::error::{WebError, WebResult};
use crate::state::SharedState;

/// The three pages that host the upload flow. They differ only in template and wording.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Dashboard,
    Analysis,
    Student,
}

impl Page {
    pub fn slug(self) -> &'static str {
        match self {
            Page::Dashboard => "dashboard",
            Page::Analysis => "analysis",
            Page::Student => "student",
        }
    }

    pub fn path(self) -> &'static str {
        match self {
            Page::Dashboard => "/dashboard",
            Page::Analysis => "/analysis",
            Page::Student => "/student",
        }
    }

    fn template(self) -> &'static str {
        match self {
            Page::Dashboard => "dashboard.html",
            Page::Analysis => "analysis.html",
            Page::Student => "student.html",
        }
    }

    pub fn failure_text(self) -> &'static str {
        match self {
            Page::Analysis => messages::ANALYSIS_FAILED_SHORT,
            Page::Dashboard | Page::Student => messages::ANALYSIS_FAILED,
        }
    }

    /// The analysis page shows the file name instead of an inline preview.
    fn shows_preview(self) -> bool {
        !matches!(self, Page::Analysis)
    }
}

// ---------------------------------------------------------------------------
// View model
// ---------------------------------------------------------------------------

#[derive(Serialize, Default)]
pub struct PageView<'a> {
    pub active: &'static str,
    /// `idle`, `loading`, `success` or `error`.
    pub state: &'static str,
    pub action: &'static str,
    pub file_name: Option<&'a str>,
    pub preview: Option<String>,
    pub loading: bool,
    pub error: Option<&'a str>,
    pub diagnosis: Option<&'a str>,
    pub confidence: Option<&'a str>,
    pub blip_report: Option<&'a str>,
    pub report: Option<&'a StructuredReport>,
    pub has_result: bool,
    /// The result serialized for follow-up forms (chat, report download).
    pub carried: Option<String>,
    pub chat: Option<ChatView<'a>>,
}

#[derive(Serialize)]
pub struct ChatView<'a> {
    pub draft: &'a str,
    pub question: Option<&'a str>,
    pub answer: Option<&'a str>,
    pub error: Option<&'a str>,
    pub loading: bool,
}

impl<'a> PageView<'a> {
    pub fn new(page: Page) -> Self {
        Self {
            active: page.slug(),
            state: "idle",
            action: page.path(),
            ..Default::default()
        }
    }

    pub fn from_flow(page: Page, flow: &'a UploadFlow) -> WebResult<Self> {
        let mut view = Self::new(page);
        // Non-image selections are never shown as the selected file.
        let image = flow.file().filter(|f| f.is_image());
        view.file_name = image.map(|f| f.file_name.as_str());
        view.state = state_label(flow.state());
        view.loading = flow.is_loading();
        view.error = flow.error();

        if page.shows_preview() && !view.loading {
            view.preview = image.map(SelectedFile::data_url);
        }
        if let Some(result) = flow.result() {
            view = view.with_result(result)?;
        }
        Ok(view)
    }

    pub fn with_result(mut self, result: &'a AnalysisResult) -> WebResult<Self> {
        self.diagnosis = result.diagnosis.as_deref();
        self.confidence = result.confidence.as_deref();
        self.blip_report = result.blip_report.as_deref();
        self.report = result.report();
        self.has_result = true;
        self.carried = Some(
            result
                .to_hidden_field()
                .map_err(|e| WebError::BadRequest(e.to_string()))?,
        );
        Ok(self)
    }

    /// Attach the chat box. Only offered once the analysis produced a diagnosis.
    pub fn with_chat(mut self, chat: &'a ChatFlow) -> Self {
        if self.diagnosis.is_none() {
            return self;
        }
        self.chat = Some(ChatView {
            draft: chat.draft(),
            question: chat.answer().map(|a| a.question.as_str()),
            answer: chat.answer().map(|a| a.answer.as_str()),
            error: chat.error(),
            loading: chat.is_loading(),
        });
        self
    }
}

pub fn render_page(state: &SharedState, page: Page, view: &PageView<'_>) -> WebResult<String> {
    Ok(state.templates.render(page.template(), view)?)
}

/// Status code for a rendered outcome: input problems are 422, backend failures 502.
pub fn status_for(error: Option<&PneumoscanError>) -> StatusCode {
    match error {
        None => StatusCode::OK,
        Some(e) if e.is_input_error() => StatusCode::UNPROCESSABLE_ENTITY,
        Some(PneumoscanError::Busy) => StatusCode::CONFLICT,
        Some(_) => StatusCode::BAD_GATEWAY,
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

pub async fn dashboard_page(State(state): State<SharedState>) -> WebResult<Html<String>> {
    idle_page(&state, Page::Dashboard)
}

pub async fn dashboard_submit(
    State(state): State<SharedState>,
    multipart: Multipart,
) -> WebResult<Response> {
    submit(&state, Page::Dashboard, multipart).await
}

pub async fn analysis_page(State(state): State<SharedState>) -> WebResult<Html<String>> {
    idle_page(&state, Page::Analysis)
}

pub async fn analysis_submit(
    State(state): State<SharedState>,
    multipart: Multipart,
) -> WebResult<Response> {
    submit(&state, Page::Analysis, multipart).await
}

pub async fn student_page(State(state): State<SharedState>) -> WebResult<Html<String>> {
    idle_page(&state, Page::Student)
}

pub async fn student_submit(
    State(state): State<SharedState>,
    multipart: Multipart,
) -> WebResult<Response> {
    submit(&state, Page::Student, multipart).await
}

fn idle_page(state: &SharedState, page: Page) -> WebResult<Html<String>> {
    Ok(Html(render_page(state, page, &PageView::new(page))?))
}

async fn submit(state: &SharedState, page: Page, multipart: Multipart) -> WebResult<Response> {
    let mut flow = UploadFlow::new(page.failure_text());

    match read_upload(multipart).await {
        Ok(Some(file)) => flow.select_file(file),
        Ok(None) => {}
        Err(e) => {
            tracing::warn!(page = page.slug(), "Could not read upload: {}", e.body_text());
            let status = e.status();
            let view = PageView {
                state: "error",
                error: Some(page.failure_text()),
                ..PageView::new(page)
            };
            return Ok((status, Html(render_page(state, page, &view)?)).into_response());
        }
    }

    let request_id = Uuid::new_v4();
    let span = tracing::info_span!(
        "analysis",
        %request_id,
        page = page.slug(),
        file = flow.file().map(|f| f.file_name.as_str()).unwrap_or(""),
    );

    let (status, outcome) = match flow.begin() {
        Ok(file) => {
            let outcome = state.inference.analyze(file).instrument(span.clone()).await;
            (status_for(outcome.as_ref().err()), Some(outcome))
        }
        Err(e) => {
            span.in_scope(|| tracing::info!("Upload rejected before analysis: {e}"));
            (status_for(Some(&e)), None)
        }
    };

    if let Some(outcome) = outcome {
        span.in_scope(|| match &outcome {
            Ok(result) => tracing::info!(
                diagnosis = result.diagnosis.as_deref().unwrap_or("-"),
                confidence = result.confidence.as_deref().unwrap_or("-"),
                "Analysis complete"
            ),
            Err(e) => tracing::error!("Inference request failed: {e}"),
        });
        flow.finish(outcome);
    }

    // A fresh analysis starts with an empty chat box.
    let chat = ChatFlow::new();
    let mut view = PageView::from_flow(page, &flow)?;
    if page == Page::Student {
        view = view.with_chat(&chat);
    }
    let html = render_page(state, page, &view)?;
    Ok((status, Html(html)).into_response())
}

/// Pull the `file` field out of a multipart body. An empty file input yields `None`.
async fn read_upload(mut multipart: Multipart) -> Result<Option<SelectedFile>, MultipartError> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some("file") {
            continue;
        }
        let file_name = field.file_name().unwrap_or_default().to_string();
        let content_type = field.content_type().unwrap_or_default().to_string();
        let bytes = field.bytes().await?;
        if file_name.is_empty() && bytes.is_empty() {
            return Ok(None);
        }
        return Ok(Some(SelectedFile::new(file_name, content_type, bytes.to_vec())));
    }
    Ok(None)
}

// ---------------------------------------------------------------------------
// Report download
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
pub struct ReportForm {
    pub analysis: String,
    #[serde(default)]
    pub file_name: String,
}

/// POST /analysis/report: the carried analysis as a plain-text attachment.
pub async fn analysis_report(Form(form): Form<ReportForm>) -> WebResult<Response> {
    let result = AnalysisResult::from_hidden_field(&form.analysis)
        .map_err(|e| WebError::BadRequest(format!("Invalid analysis payload: {e}")))?
        .ok_or_else(|| WebError::BadRequest("No analysis to export".to_string()))?;

    let body = render_plain_report(&result, &form.file_name, chrono::Utc::now());
    let disposition = format!("attachment; filename=\"{}\"", report_file_name(&form.file_name));

    Ok((
        [
            (header::CONTENT_TYPE, "text/plain; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        body,
    )
        .into_response())
}

fn state_label(state: &FlowState) -> &'static str {
    match state {
        FlowState::Idle => "idle",
        FlowState::Loading => "loading",
        FlowState::Success(_) => "success",
        FlowState::Failed(_) => "error",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::templates::Templates;

    fn png() -> SelectedFile {
        SelectedFile::new("xray.png", "image/png", vec![0x89, b'P', b'N', b'G'])
    }

    #[test]
    fn test_loading_state_disables_submit() {
        let mut flow = UploadFlow::new(Page::Dashboard.failure_text());
        flow.select_file(png());
        flow.begin().unwrap();

        let view = PageView::from_flow(Page::Dashboard, &flow).unwrap();
        assert_eq!(view.state, "loading");
        assert!(view.preview.is_none(), "preview is hidden while loading");

        let html = Templates::new().unwrap().render("dashboard.html", &view).unwrap();
        assert!(html.contains("Analyzing..."));
        assert!(html.contains("disabled"));
        assert!(!html.contains("Upload and Analyze</button>"));
    }

    #[test]
    fn test_idle_page_has_placeholder_on_analysis() {
        let view = PageView::new(Page::Analysis);
        let html = Templates::new().unwrap().render("analysis.html", &view).unwrap();
        assert!(html.contains("Upload an image to see analysis results"));
        assert!(html.contains(r#"data-state="idle""#));
    }

    #[test]
    fn test_preview_only_on_dashboard_and_student() {
        let mut flow = UploadFlow::new(Page::Analysis.failure_text());
        flow.select_file(png());
        assert!(PageView::from_flow(Page::Analysis, &flow).unwrap().preview.is_none());
        assert!(PageView::from_flow(Page::Student, &flow).unwrap().preview.is_some());
    }

    #[test]
    fn test_non_image_selection_is_not_named() {
        let mut flow = UploadFlow::new(Page::Analysis.failure_text());
        flow.select_file(SelectedFile::new("notes.txt", "text/plain", b"hello".to_vec()));
        assert!(flow.begin().is_err());

        let view = PageView::from_flow(Page::Analysis, &flow).unwrap();
        assert_eq!(view.file_name, None);
        assert_eq!(view.error, Some(messages::NOT_AN_IMAGE));

        let html = Templates::new().unwrap().render("analysis.html", &view).unwrap();
        assert!(!html.contains("notes.txt"));
        assert!(html.contains(r#"data-selected-file hidden"#));
    }

    #[test]
    fn test_chat_offered_only_with_diagnosis() {
        let chat = ChatFlow::new();
        let undiagnosed = AnalysisResult {
            confidence: Some("50%".into()),
            ..Default::default()
        };
        let view = PageView::new(Page::Student).with_result(&undiagnosed).unwrap().with_chat(&chat);
        assert!(view.chat.is_none());

        let diagnosed = AnalysisResult {
            diagnosis: Some("Pneumonia".into()),
            ..Default::default()
        };
        let view = PageView::new(Page::Student).with_result(&diagnosed).unwrap().with_chat(&chat);
        assert!(view.chat.is_some());
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(status_for(None), StatusCode::OK);
        assert_eq!(
            status_for(Some(&PneumoscanError::FileMissing)),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(status_for(Some(&PneumoscanError::Busy)), StatusCode::CONFLICT);
        assert_eq!(
            status_for(Some(&PneumoscanError::Backend { status: 500, body: String::new() })),
            StatusCode::BAD_GATEWAY
        );
    }

    #[test]
    fn test_page_wording() {
        assert_eq!(Page::Analysis.failure_text(), messages::ANALYSIS_FAILED_SHORT);
        assert_eq!(Page::Student.failure_text(), messages::ANALYSIS_FAILED);
        assert_eq!(Page::Dashboard.path(), "/dashboard");
    }
}
