//! Static assets, compiled into the binary.

use axum::http::header;
use axum::response::IntoResponse;

const MAIN_CSS: &str = include_str!("../../static/css/main.css");
const UPLOAD_JS: &str = include_str!("../../static/js/upload.js");

pub async fn main_css() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "text/css; charset=utf-8")], MAIN_CSS)
}

pub async fn upload_js() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "application/javascript; charset=utf-8")], UPLOAD_JS)
}
