//! Student follow-up chat: forwards a question about the current analysis to `/chat`.

use axum::{
    extract::State,
    response::{Html, IntoResponse, Response},
    Form,
};
use serde::Deserialize;

use pneumoscan_common::{AnalysisResult, ChatFlow};

use crate::error::WebResult;
use crate::handlers::upload::{render_page, status_for, Page, PageView};
use crate::state::SharedState;

#[derive(Deserialize)]
pub struct ChatForm {
    #[serde(default)]
    pub question: String,
    /// The analysis the question is about, carried from the previous render.
    #[serde(default)]
    pub analysis: String,
    #[serde(default)]
    pub file_name: String,
}

/// POST /student/chat
pub async fn student_chat(
    State(state): State<SharedState>,
    Form(form): Form<ChatForm>,
) -> WebResult<Response> {
    let analysis = match AnalysisResult::from_hidden_field(&form.analysis) {
        Ok(analysis) => analysis,
        Err(e) => {
            tracing::warn!("Discarding unreadable analysis payload: {e}");
            None
        }
    };

    let mut chat = ChatFlow::new();
    let status = match chat.begin(&form.question, analysis.as_ref()) {
        Ok(question) => {
            let outcome = state.inference.chat(&question).await;
            match &outcome {
                Ok(_) => tracing::info!("Chat answered ({} chars asked)", question.len()),
                Err(e) => tracing::error!("Chat request failed: {e}"),
            }
            let status = status_for(outcome.as_ref().err());
            chat.finish(outcome);
            status
        }
        Err(e) => {
            tracing::info!("Chat rejected before sending: {e}");
            status_for(Some(&e))
        }
    };

    let mut view = PageView::new(Page::Student);
    if !form.file_name.is_empty() {
        view.file_name = Some(form.file_name.as_str());
    }
    match analysis.as_ref() {
        Some(result) => {
            view = view.with_result(result)?.with_chat(&chat);
            view.state = "success";
        }
        None => {
            // No diagnosis on the page: the chat box stays hidden, so the
            // error goes in the banner.
            view.error = chat.error();
            view.state = "error";
        }
    }

    let html = render_page(&state, Page::Student, &view)?;
    Ok((status, Html(html)).into_response())
}
