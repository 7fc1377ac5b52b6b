//! Axum router: maps all URL paths to handlers.

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::{compression::CompressionLayer, trace::TraceLayer};
use std::sync::Arc;
use crate::state::{AppState, SharedState};
use crate::handlers::{
    assets::{main_css, upload_js},
    home::home,
    profile::profile_page,
    student::student_chat,
    system::health,
    upload::{
        analysis_page, analysis_report, analysis_submit, dashboard_page, dashboard_submit,
        student_page, student_submit,
    },
};

/// Build and return the full Axum router.
pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.server.max_upload_bytes;
    let shared: SharedState = Arc::new(state);

    Router::new()
        // Pages
        .route("/",                get(home))
        .route("/dashboard",       get(dashboard_page).post(dashboard_submit))
        .route("/analysis",        get(analysis_page).post(analysis_submit))
        .route("/analysis/report", post(analysis_report))
        .route("/student",         get(student_page).post(student_submit))
        .route("/student/chat",    post(student_chat))
        .route("/profile",         get(profile_page))

        // Static assets
        .route("/static/css/main.css", get(main_css))
        .route("/static/js/upload.js", get(upload_js))

        .route("/health", get(health))

        // Middleware
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(shared)
}
