//! End-to-end tests: the real router served on an ephemeral port, driven over
//! HTTP, with a recording in-memory inference backend behind it.

use std::sync::Arc;

use pretty_assertions::assert_eq;
use reqwest::multipart::{Form, Part};
use reqwest::StatusCode;

use pneumoscan_common::flow::messages;
use pneumoscan_common::AnalysisResult;
use pneumoscan_config::Config;
use pneumoscan_test_utils::{png_bytes, pneumonia_result, serve, MockInference};
use pneumoscan_web::router::build_router;
use pneumoscan_web::state::AppState;

struct TestApp {
    base: String,
    mock: Arc<MockInference>,
    http: reqwest::Client,
}

impl TestApp {
    async fn spawn(mock: MockInference) -> Self {
        Self::spawn_with_config(mock, Config::default()).await
    }

    async fn spawn_with_config(mock: MockInference, config: Config) -> Self {
        let mock = Arc::new(mock);
        let state = AppState::with_inference(config, mock.clone()).unwrap();
        let addr = serve(build_router(state)).await.unwrap();
        Self {
            base: format!("http://{addr}"),
            mock,
            http: reqwest::Client::new(),
        }
    }

    async fn get(&self, path: &str) -> (StatusCode, String) {
        let resp = self.http.get(format!("{}{}", self.base, path)).send().await.unwrap();
        (resp.status(), resp.text().await.unwrap())
    }

    async fn upload(
        &self,
        path: &str,
        file_name: &str,
        mime: &str,
        bytes: Vec<u8>,
    ) -> (StatusCode, String) {
        let part = Part::bytes(bytes).file_name(file_name.to_string()).mime_str(mime).unwrap();
        self.post_multipart(path, Form::new().part("file", part)).await
    }

    async fn post_multipart(&self, path: &str, form: Form) -> (StatusCode, String) {
        let resp = self.http
            .post(format!("{}{}", self.base, path))
            .multipart(form)
            .send()
            .await
            .unwrap();
        (resp.status(), resp.text().await.unwrap())
    }

    async fn chat(&self, question: &str, analysis: &str) -> (StatusCode, String) {
        let resp = self.http
            .post(format!("{}/student/chat", self.base))
            .form(&[("question", question), ("analysis", analysis), ("file_name", "xray.png")])
            .send()
            .await
            .unwrap();
        (resp.status(), resp.text().await.unwrap())
    }
}

fn carried(result: &AnalysisResult) -> String {
    result.to_hidden_field().unwrap()
}

#[tokio::test]
async fn test_every_page_renders() {
    let app = TestApp::spawn(MockInference::new()).await;
    for (path, marker) in [
        ("/", "Choose Your Role"),
        ("/dashboard", "Dashboard"),
        ("/analysis", "Pneumonia Analysis"),
        ("/student", "X-Ray Analysis and Medical Assistance"),
        ("/profile", "Senior Radiologist"),
    ] {
        let (status, body) = app.get(path).await;
        assert_eq!(status, StatusCode::OK, "{path}");
        assert!(body.contains(marker), "{path} should contain {marker}");
    }
    assert!(app.mock.analyze_calls().is_empty());
}

#[tokio::test]
async fn test_home_links_roles() {
    let app = TestApp::spawn(MockInference::new()).await;
    let (_, body) = app.get("/").await;
    assert!(body.contains("For Doctors"));
    assert!(body.contains("For Students"));
    assert!(body.contains("role-doctor"));
    assert!(body.contains("role-student"));
}

#[tokio::test]
async fn test_dashboard_renders_full_result() {
    let app = TestApp::spawn(MockInference::new()).await;
    let (status, body) = app.upload("/dashboard", "xray.png", "image/png", png_bytes()).await;

    assert_eq!(status, StatusCode::OK);
    let expected = pneumonia_result();
    let report = expected.structured_report.clone().unwrap();
    for text in [
        expected.diagnosis.unwrap(),
        expected.confidence.unwrap(),
        expected.blip_report.unwrap(),
        report.biological_causes.unwrap(),
        report.pathological_analysis.unwrap(),
        report.environmental_factors.unwrap(),
    ] {
        assert!(body.contains(&text), "missing {text}");
    }
    assert!(body.contains("Structured Report"));
    assert!(body.contains(r#"alt="Uploaded X-ray""#));
    assert!(body.contains(r#"data-state="success""#));
    assert!(!body.contains("data-chat-form"), "chat is a student feature");

    let calls = app.mock.analyze_calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].file_name, "xray.png");
    assert_eq!(calls[0].content_type, "image/png");
    assert_eq!(calls[0].bytes, png_bytes());
}

#[tokio::test]
async fn test_non_image_never_reaches_backend() {
    let app = TestApp::spawn(MockInference::new()).await;
    for path in ["/dashboard", "/analysis", "/student"] {
        let (status, body) = app.upload(path, "notes.txt", "text/plain", b"hello".to_vec()).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY, "{path}");
        assert!(body.contains(messages::NOT_AN_IMAGE), "{path}");
        assert!(!body.contains(r#"data-field="diagnosis""#), "{path}");
        assert!(!body.contains("notes.txt"), "{path} names a non-image selection");
    }
    assert!(app.mock.analyze_calls().is_empty());
}

#[tokio::test]
async fn test_missing_file_never_reaches_backend() {
    let app = TestApp::spawn(MockInference::new()).await;
    let (status, body) = app
        .post_multipart("/dashboard", Form::new().text("note", "no file here"))
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body.contains(messages::FILE_MISSING));
    assert!(app.mock.analyze_calls().is_empty());
}

#[tokio::test]
async fn test_backend_failure_shows_banner_and_no_fields() {
    let app = TestApp::spawn(MockInference::new().with_analysis_status(500)).await;
    let (status, body) = app.upload("/dashboard", "xray.png", "image/png", png_bytes()).await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert!(body.contains(messages::ANALYSIS_FAILED));
    assert!(!body.contains(r#"data-field="diagnosis""#));
    assert!(!body.contains(r#"data-field="confidence""#));
    assert!(!body.contains("Structured Report"));
    assert!(body.contains(r#"data-state="error""#));
    assert_eq!(app.mock.analyze_calls().len(), 1);
}

#[tokio::test]
async fn test_analysis_page_uses_its_own_failure_text() {
    let app = TestApp::spawn(MockInference::new().with_analysis_status(503)).await;
    let (status, body) = app.upload("/analysis", "xray.png", "image/png", png_bytes()).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert!(body.contains(messages::ANALYSIS_FAILED_SHORT));
    assert!(!body.contains("Download Full Report"));
}

#[tokio::test]
async fn test_dropped_xray_with_partial_payload() {
    let partial = AnalysisResult {
        diagnosis: Some("Bacterial Pneumonia".into()),
        confidence: Some("87%".into()),
        ..Default::default()
    };
    let app = TestApp::spawn(MockInference::new().with_analysis(partial)).await;
    let (status, body) = app.upload("/analysis", "xray.png", "image/png", png_bytes()).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains(r#"data-field="diagnosis">Bacterial Pneumonia<"#));
    assert!(body.contains(r#"data-field="confidence">87%<"#));
    assert!(body.contains("xray.png"));
    assert!(!body.contains(r#"data-field="biological_causes""#));
    assert!(body.contains("Download Full Report"));
}

#[tokio::test]
async fn test_backend_strings_are_escaped() {
    let hostile = AnalysisResult {
        diagnosis: Some("<b>Pneumonia</b>".into()),
        ..Default::default()
    };
    let app = TestApp::spawn(MockInference::new().with_analysis(hostile)).await;
    let (_, body) = app.upload("/dashboard", "xray.png", "image/png", png_bytes()).await;
    assert!(body.contains("&lt;b&gt;Pneumonia"));
    assert!(!body.contains("<b>Pneumonia</b>"));
}

#[tokio::test]
async fn test_chat_form_appears_only_after_diagnosis() {
    let app = TestApp::spawn(MockInference::new()).await;
    let (_, idle) = app.get("/student").await;
    assert!(!idle.contains("data-chat-form"));

    let (_, analysed) = app.upload("/student", "xray.png", "image/png", png_bytes()).await;
    assert!(analysed.contains("data-chat-form"));
    assert!(analysed.contains("Ask a Question"));

    let undiagnosed = AnalysisResult {
        confidence: Some("40%".into()),
        ..Default::default()
    };
    let app = TestApp::spawn(MockInference::new().with_analysis(undiagnosed)).await;
    let (_, body) = app.upload("/student", "xray.png", "image/png", png_bytes()).await;
    assert!(!body.contains("data-chat-form"));
}

#[tokio::test]
async fn test_empty_question_never_reaches_backend() {
    let app = TestApp::spawn(MockInference::new()).await;
    let (status, body) = app.chat("   ", &carried(&pneumonia_result())).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body.contains(messages::QUESTION_EMPTY));
    assert!(body.contains(r#"data-field="diagnosis">Pneumonia<"#));
    assert!(app.mock.chat_calls().is_empty());
}

#[tokio::test]
async fn test_chat_without_analysis_is_rejected() {
    let app = TestApp::spawn(MockInference::new()).await;
    let (status, body) = app.chat("What is this?", "").await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body.contains(messages::NO_DIAGNOSIS));
    assert!(!body.contains("data-chat-form"));
    assert!(app.mock.chat_calls().is_empty());
}

#[tokio::test]
async fn test_chat_answer_is_rendered() {
    let mock = MockInference::new().with_answer("Usually treated with antibiotics.");
    let app = TestApp::spawn(mock).await;
    let (status, body) = app.chat("  How is it treated?  ", &carried(&pneumonia_result())).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains(r#"data-field="answer">Usually treated with antibiotics.<"#));
    assert!(body.contains(r#"data-field="diagnosis">Pneumonia<"#));
    assert!(body.contains("Analyzed file: xray.png"));
    assert_eq!(app.mock.chat_calls(), vec!["How is it treated?".to_string()]);
}

#[tokio::test]
async fn test_chat_failure_keeps_analysis() {
    let app = TestApp::spawn(MockInference::new().with_chat_status(500)).await;
    let (status, body) = app.chat("How is it treated?", &carried(&pneumonia_result())).await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert!(body.contains(messages::CHAT_FAILED));
    assert!(body.contains(r#"data-field="confidence">92%<"#));
    assert!(!body.contains(r#"data-field="answer""#));
}

#[tokio::test]
async fn test_report_download() {
    let app = TestApp::spawn(MockInference::new()).await;
    let analysis = carried(&pneumonia_result());
    let resp = app.http
        .post(format!("{}/analysis/report", app.base))
        .form(&[("analysis", analysis.as_str()), ("file_name", "xray.png")])
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers()["content-disposition"].to_str().unwrap(),
        r#"attachment; filename="xray-report.txt""#
    );
    let text = resp.text().await.unwrap();
    assert!(text.contains("Prediction:   Pneumonia"));
    assert!(text.contains("Confidence:   92%"));
    assert!(text.contains("Environmental Factors:"));
    assert!(app.mock.analyze_calls().is_empty());
}

#[tokio::test]
async fn test_report_download_requires_analysis() {
    let app = TestApp::spawn(MockInference::new()).await;
    let resp = app.http
        .post(format!("{}/analysis/report", app.base))
        .form(&[("analysis", ""), ("file_name", "xray.png")])
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_oversized_upload_is_rejected() {
    let mut config = Config::default();
    config.server.max_upload_bytes = 1024;
    let app = TestApp::spawn_with_config(MockInference::new(), config).await;

    let (status, body) = app
        .upload("/dashboard", "huge.png", "image/png", vec![0u8; 4 * 1024])
        .await;
    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert!(body.contains(messages::ANALYSIS_FAILED));
    assert!(body.contains(r#"data-state="error""#));
    assert!(app.mock.analyze_calls().is_empty());
}

#[tokio::test]
async fn test_static_assets_and_health() {
    let app = TestApp::spawn(MockInference::new()).await;

    let resp = app.http.get(format!("{}/static/css/main.css", app.base)).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.headers()["content-type"].to_str().unwrap().starts_with("text/css"));

    let (status, js) = app.get("/static/js/upload.js").await;
    assert_eq!(status, StatusCode::OK);
    assert!(js.contains("data-upload-form"));

    let (status, body) = app.get("/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "ok");
}
